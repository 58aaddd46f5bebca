mod cluster;
mod geometry;
mod globe;
mod projection;
mod renderer;

pub use cluster::Cluster;
pub use globe::GlobeViewport;
pub use projection::Viewport;
pub use renderer::{
    markers_from_records, DisplaySettings, Label, LabelKind, Lod, MapLayers, MapRenderer, Marker,
};

/// The active view: flat Mercator map or orthographic globe. Both expose the
/// same project/unproject/pan/zoom surface, so the renderer and event loop
/// stay projection-agnostic.
#[derive(Clone)]
pub enum Projection {
    Flat(Viewport),
    Globe(GlobeViewport),
}

impl Projection {
    /// Whole-world flat view.
    pub fn world(width: usize, height: usize) -> Self {
        Projection::Flat(Viewport::world(width, height))
    }

    /// Switch between flat and globe, preserving center and zoom.
    pub fn toggled(&self) -> Self {
        match self {
            Projection::Flat(vp) => Projection::Globe(GlobeViewport::from_flat(vp)),
            Projection::Globe(globe) => Projection::Flat(globe.to_flat()),
        }
    }

    pub fn is_globe(&self) -> bool {
        matches!(self, Projection::Globe(_))
    }

    /// Project (lon, lat) to braille pixels. `None` when the point is culled
    /// (globe back face).
    pub fn project(&self, lon: f64, lat: f64) -> Option<(i32, i32)> {
        match self {
            Projection::Flat(vp) => Some(vp.project(lon, lat)),
            Projection::Globe(globe) => globe.project(lon, lat),
        }
    }

    /// Unproject braille pixels to (lon, lat). `None` off the globe disk.
    pub fn unproject(&self, px: i32, py: i32) -> Option<(f64, f64)> {
        match self {
            Projection::Flat(vp) => Some(vp.unproject(px, py)),
            Projection::Globe(globe) => globe.unproject(px, py),
        }
    }

    /// Move the view by a pixel delta: pans the flat map, rotates the globe.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        match self {
            Projection::Flat(vp) => vp.pan(dx, dy),
            Projection::Globe(globe) => globe.rotate_drag(dx, dy),
        }
    }

    pub fn zoom_in(&mut self) {
        match self {
            Projection::Flat(vp) => vp.zoom_in(),
            Projection::Globe(globe) => globe.zoom_in(),
        }
    }

    pub fn zoom_out(&mut self) {
        match self {
            Projection::Flat(vp) => vp.zoom_out(),
            Projection::Globe(globe) => globe.zoom_out(),
        }
    }

    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        match self {
            Projection::Flat(vp) => vp.zoom_in_at(px, py),
            Projection::Globe(globe) => globe.zoom_in_at(px, py),
        }
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        match self {
            Projection::Flat(vp) => vp.zoom_out_at(px, py),
            Projection::Globe(globe) => globe.zoom_out_at(px, py),
        }
    }

    /// Zoom level normalized so 1.0 is the world-fit view in either mode.
    pub fn zoom(&self) -> f64 {
        match self {
            Projection::Flat(vp) => vp.zoom,
            Projection::Globe(globe) => globe.effective_zoom(),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        match self {
            Projection::Flat(vp) => (vp.center_lon, vp.center_lat),
            Projection::Globe(globe) => (globe.center_lon(), globe.center_lat()),
        }
    }

    /// Recenter on a geographic point (marker cycling).
    pub fn center_on(&mut self, lon: f64, lat: f64) {
        match self {
            Projection::Flat(vp) => {
                vp.center_lon = lon;
                vp.center_lat = lat.clamp(-85.0, 85.0);
            }
            Projection::Globe(globe) => {
                *globe = GlobeViewport::new(lon, lat, globe.radius, globe.width, globe.height);
            }
        }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        match self {
            Projection::Flat(vp) => {
                vp.width = width;
                vp.height = height;
            }
            Projection::Globe(globe) => globe.set_size(width, height),
        }
    }

    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        match self {
            Projection::Flat(vp) => vp.is_visible(px, py),
            Projection::Globe(globe) => globe.is_visible(px, py),
        }
    }

    pub fn segment_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        match self {
            Projection::Flat(vp) => vp.segment_might_be_visible(p1, p2),
            Projection::Globe(globe) => globe.segment_might_be_visible(p1, p2),
        }
    }
}
