//! Output seam between the pipeline and whatever draws its results.

use crate::ViewportObjectRepresentation;

/// Receives each device-mapped object the pipeline produces, in draw order.
///
/// Renderers implement this to draw straight from the pipeline without
/// buffering the whole frame.
pub trait ViewportVisitor {
    /// Called once per object.
    fn visit(&mut self, object: &ViewportObjectRepresentation);
}

/// Buffers every visited object.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<ViewportObjectRepresentation>,
}

impl CollectingVisitor {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects seen so far, in visit order.
    pub fn objects(&self) -> &[ViewportObjectRepresentation] {
        &self.collected
    }

    /// Consumes the collector, returning the objects.
    pub fn into_objects(self) -> Vec<ViewportObjectRepresentation> {
        self.collected
    }
}

impl ViewportVisitor for CollectingVisitor {
    fn visit(&mut self, object: &ViewportObjectRepresentation) {
        self.collected.push(object.clone());
    }
}

/// Calls a closure for each object.
pub struct FnVisitor<F>
where
    F: FnMut(&ViewportObjectRepresentation),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&ViewportObjectRepresentation),
{
    /// Wraps `func` as a visitor.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> ViewportVisitor for FnVisitor<F>
where
    F: FnMut(&ViewportObjectRepresentation),
{
    fn visit(&mut self, object: &ViewportObjectRepresentation) {
        (self.func)(object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point3D, Rgb};

    fn object(name: &str) -> ViewportObjectRepresentation {
        ViewportObjectRepresentation {
            name: name.to_owned(),
            points: vec![Point3D::xy(1.0, 2.0)],
            color: Rgb::BLACK,
            thickness: 1.0,
        }
    }

    #[test]
    fn collecting_visitor_keeps_order() {
        let mut visitor = CollectingVisitor::new();
        assert!(visitor.objects().is_empty());
        visitor.visit(&object("a"));
        visitor.visit(&object("b"));
        let names: Vec<_> = visitor.into_objects().into_iter().map(|o| o.name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn fn_visitor_calls_closure() {
        let mut seen = Vec::new();
        {
            let mut visitor = FnVisitor::new(|o: &ViewportObjectRepresentation| {
                seen.push(o.name.clone());
            });
            visitor.visit(&object("x"));
        }
        assert_eq!(seen, ["x"]);
    }
}
