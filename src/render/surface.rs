//! Drawing surface interface and an in-memory implementation

use std::collections::BTreeMap;

use glam::Vec2;

/// Opaque handle of a shape on a surface
pub type ShapeHandle = u64;

/// Shape kind plus its placement
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Oval { center: Vec2, radius: f32 },
    Rectangle { center: Vec2, half_extents: Vec2 },
    /// Sprite stretched over a box
    Image {
        center: Vec2,
        half_extents: Vec2,
        path: String,
    },
}

impl Geometry {
    pub fn center(&self) -> Vec2 {
        match self {
            Geometry::Oval { center, .. }
            | Geometry::Rectangle { center, .. }
            | Geometry::Image { center, .. } => *center,
        }
    }

    /// Same shape moved to `center`
    pub fn with_center(&self, center: Vec2) -> Geometry {
        let mut moved = self.clone();
        match &mut moved {
            Geometry::Oval { center: c, .. }
            | Geometry::Rectangle { center: c, .. }
            | Geometry::Image { center: c, .. } => *c = center,
        }
        moved
    }
}

/// Fill style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// CSS-style color; `None` for sprites
    pub fill: Option<&'static str>,
}

/// External drawing service
pub trait Surface {
    fn create_shape(&mut self, geometry: &Geometry, style: &Style) -> ShapeHandle;
    fn move_shape(&mut self, handle: ShapeHandle, dx: f32, dy: f32);
    fn delete(&mut self, handle: ShapeHandle);
    fn redraw(&mut self, handle: ShapeHandle, geometry: &Geometry);
}

/// Operation counters for [`HeadlessSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceStats {
    pub created: u64,
    pub moved: u64,
    pub redrawn: u64,
    pub deleted: u64,
}

/// Surface that only keeps shapes in memory
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    shapes: BTreeMap<ShapeHandle, (Geometry, Style)>,
    next_handle: ShapeHandle,
    pub stats: SurfaceStats,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&(Geometry, Style)> {
        self.shapes.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeHandle, &Geometry)> + '_ {
        self.shapes.iter().map(|(&handle, (geometry, _))| (handle, geometry))
    }
}

impl Surface for HeadlessSurface {
    fn create_shape(&mut self, geometry: &Geometry, style: &Style) -> ShapeHandle {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.shapes.insert(handle, (geometry.clone(), *style));
        self.stats.created += 1;
        handle
    }

    fn move_shape(&mut self, handle: ShapeHandle, dx: f32, dy: f32) {
        if let Some((geometry, _)) = self.shapes.get_mut(&handle) {
            *geometry = geometry.with_center(geometry.center() + Vec2::new(dx, dy));
            self.stats.moved += 1;
        } else {
            log::warn!("move of unknown shape {handle}");
        }
    }

    fn delete(&mut self, handle: ShapeHandle) {
        if self.shapes.remove(&handle).is_some() {
            self.stats.deleted += 1;
        }
    }

    fn redraw(&mut self, handle: ShapeHandle, geometry: &Geometry) {
        if let Some((current, _)) = self.shapes.get_mut(&handle) {
            *current = geometry.clone();
            self.stats.redrawn += 1;
        } else {
            log::warn!("redraw of unknown shape {handle}");
        }
    }
}
