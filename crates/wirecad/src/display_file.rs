//! The scene: an ordered list of uniquely named drawables.

use crate::{Drawable, GeometryError, Result};

/// Ordered scene contents. Names are unique; draw order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct DisplayFile {
    objects: Vec<Drawable>,
}

impl DisplayFile {
    /// Creates an empty display file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when there are no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in insertion order.
    pub fn as_slice(&self) -> &[Drawable] {
        &self.objects
    }

    /// Iterates objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.objects.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name() == name)
    }

    /// True if an object with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Looks an object up by name.
    pub fn get(&self, name: &str) -> Option<&Drawable> {
        self.position(name).map(|i| &self.objects[i])
    }

    /// Appends a drawable; fails if its name is taken.
    pub fn insert(&mut self, drawable: Drawable) -> Result<()> {
        if self.contains(drawable.name()) {
            return Err(GeometryError::invalid(format!(
                "an object named `{}` already exists",
                drawable.name()
            )));
        }
        log::debug!("added {} `{}`", drawable.kind(), drawable.name());
        self.objects.push(drawable);
        Ok(())
    }

    /// Swaps in a new version of `name` at the same draw position.
    ///
    /// The replacement may be renamed, as long as the new name is free.
    pub fn replace(&mut self, name: &str, drawable: Drawable) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| GeometryError::invalid(format!("no object named `{name}`")))?;
        if drawable.name() != name && self.contains(drawable.name()) {
            return Err(GeometryError::invalid(format!(
                "an object named `{}` already exists",
                drawable.name()
            )));
        }
        self.objects[index] = drawable;
        Ok(())
    }

    /// Removes and returns the named object.
    pub fn remove(&mut self, name: &str) -> Option<Drawable> {
        self.position(name).map(|i| self.objects.remove(i))
    }

    /// First free name of the form `prefix00`, `prefix01`, ...
    pub fn unique_name(&self, prefix: &str) -> String {
        (0..)
            .map(|i| format!("{prefix}{i:02}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| prefix.to_owned())
    }
}

impl Extend<Drawable> for DisplayFile {
    /// Inserts each drawable in order. Name clashes are logged and skipped.
    fn extend<I: IntoIterator<Item = Drawable>>(&mut self, iter: I) {
        for drawable in iter {
            if let Err(err) = self.insert(drawable) {
                log::warn!("not adding object: {err}");
            }
        }
    }
}

impl<'a> IntoIterator for &'a DisplayFile {
    type Item = &'a Drawable;
    type IntoIter = std::slice::Iter<'a, Drawable>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attributes, NamedPoint, Point3D};

    fn point(name: &str) -> Drawable {
        NamedPoint::new(Attributes::named(name), Point3D::default()).into()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut file = DisplayFile::new();
        file.insert(point("a")).unwrap();
        assert!(matches!(file.insert(point("a")), Err(GeometryError::InvalidArgument(_))));
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn unique_names_count_up() {
        let mut file = DisplayFile::new();
        assert_eq!(file.unique_name("point"), "point00");
        file.insert(point("point00")).unwrap();
        file.insert(point("point01")).unwrap();
        assert_eq!(file.unique_name("point"), "point02");
        file.remove("point00");
        assert_eq!(file.unique_name("point"), "point00");
    }

    #[test]
    fn replace_keeps_draw_order() {
        let mut file = DisplayFile::new();
        file.extend([point("a"), point("b"), point("c")]);
        let moved: Drawable =
            NamedPoint::new(Attributes::named("b"), Point3D::xy(5.0, 5.0)).into();
        file.replace("b", moved.clone()).unwrap();

        let names: Vec<_> = file.iter().map(Drawable::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(file.get("b"), Some(&moved));

        assert!(file.replace("missing", point("x")).is_err());
        assert!(file.replace("a", point("c")).is_err());
    }
}
