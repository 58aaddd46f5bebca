use glam::DVec3;

use crate::map::projection::Viewport;

/// Globe viewport: orthographic projection of a rotating sphere.
/// Orientation is an orthonormal basis so points transform with three dot
/// products and no quaternion plumbing.
#[derive(Clone)]
pub struct GlobeViewport {
    /// Direction from the sphere center toward the camera
    forward: DVec3,
    /// Points east on screen
    right: DVec3,
    /// Points north on screen
    up: DVec3,
    /// Sphere radius in braille pixels (controls zoom)
    pub radius: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// World view fits the sphere at 0.35x the canvas width.
const FIT_FACTOR: f64 = 0.35;
const MAX_ZOOM_FACTOR: f64 = 35.0;

impl GlobeViewport {
    /// Build a globe centered on (lon, lat) with the given pixel radius.
    pub fn new(center_lon: f64, center_lat: f64, radius: f64, width: usize, height: usize) -> Self {
        let forward = lonlat_to_vec3(center_lon, center_lat);

        // North-pointing tangent at the center; degenerate only at the poles
        let lon_rad = center_lon.to_radians();
        let lat_rad = center_lat.to_radians();
        let north = DVec3::new(
            -lat_rad.sin() * lon_rad.cos(),
            -lat_rad.sin() * lon_rad.sin(),
            lat_rad.cos(),
        );

        let right = forward.cross(north).normalize();
        let up = right.cross(forward).normalize();

        Self {
            forward,
            right,
            up,
            radius,
            width,
            height,
        }
    }

    /// Enter globe mode from a flat viewport, preserving center and
    /// proportional zoom.
    pub fn from_flat(vp: &Viewport) -> Self {
        let radius = vp.width as f64 * FIT_FACTOR * vp.zoom;
        Self::new(vp.center_lon, vp.center_lat, radius, vp.width, vp.height)
    }

    /// Leave globe mode, handing center and zoom back to a flat viewport.
    pub fn to_flat(&self) -> Viewport {
        let (lon, lat) = self.center_lonlat();
        Viewport::new(lon, lat, self.effective_zoom(), self.width, self.height)
    }

    fn center_lonlat(&self) -> (f64, f64) {
        let lat = self.forward.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = self.forward.y.atan2(self.forward.x).to_degrees();
        (lon, lat)
    }

    /// Project (lon, lat) to screen pixels. `None` for points behind the
    /// visible hemisphere.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(i32, i32)> {
        let p = lonlat_to_vec3(lon, lat);
        if p.dot(self.forward) < 0.0 {
            return None;
        }

        let sx = p.dot(self.right);
        let sy = p.dot(self.up);
        let px = (self.width as f64 / 2.0 + sx * self.radius) as i32;
        let py = (self.height as f64 / 2.0 - sy * self.radius) as i32;
        Some((px, py))
    }

    /// Unproject screen pixels back to (lon, lat). `None` outside the
    /// sphere disk; this is the picking primitive.
    pub fn unproject(&self, px: i32, py: i32) -> Option<(f64, f64)> {
        let sx = (px as f64 - self.width as f64 / 2.0) / self.radius;
        let sy = -(py as f64 - self.height as f64 / 2.0) / self.radius;

        let r2 = sx * sx + sy * sy;
        if r2 > 1.0 {
            return None;
        }

        let sz = (1.0 - r2).sqrt();
        let p = self.right * sx + self.up * sy + self.forward * sz;

        let lat = p.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = p.y.atan2(p.x).to_degrees();
        Some((lon, lat))
    }

    /// Rotate around the up axis (horizontal drag → longitude change).
    fn yaw(&mut self, angle: f64) {
        if angle.abs() < 1e-10 {
            return;
        }
        let (sin_a, cos_a) = angle.sin_cos();
        let forward = self.forward * cos_a + self.right * sin_a;
        let right = self.right * cos_a - self.forward * sin_a;
        self.forward = forward.normalize();
        self.right = right.normalize();
    }

    /// Rotate around the right axis (vertical drag → latitude change).
    fn pitch(&mut self, angle: f64) {
        if angle.abs() < 1e-10 {
            return;
        }
        let (sin_a, cos_a) = angle.sin_cos();
        let forward = self.forward * cos_a + self.up * sin_a;
        let up = self.up * cos_a - self.forward * sin_a;
        self.forward = forward.normalize();
        self.up = up.normalize();
    }

    /// Rotate the globe by a pixel drag delta so the surface follows the
    /// cursor.
    pub fn rotate_drag(&mut self, dx: i32, dy: i32) {
        self.yaw(dx as f64 / self.radius);
        self.pitch(-(dy as f64) / self.radius);
    }

    pub fn zoom_in(&mut self) {
        self.radius = (self.radius * 1.5).min(self.max_radius());
    }

    pub fn zoom_out(&mut self) {
        self.radius = (self.radius / 1.5).max(self.min_radius());
    }

    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by a factor keeping the geographic point under the cursor fixed.
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let target = self.unproject(px, py);

        self.radius = (self.radius * factor).clamp(self.min_radius(), self.max_radius());

        if let Some((lon, lat)) = target {
            let p = lonlat_to_vec3(lon, lat);
            // Where the point sits now vs. where the cursor wants it
            let sx_now = p.dot(self.right);
            let sy_now = p.dot(self.up);
            let sx_want = (px as f64 - self.width as f64 / 2.0) / self.radius;
            let sy_want = -(py as f64 - self.height as f64 / 2.0) / self.radius;

            self.yaw(sx_now - sx_want);
            self.pitch(sy_want - sy_now);
        }
    }

    fn min_radius(&self) -> f64 {
        self.width as f64 * FIT_FACTOR
    }

    fn max_radius(&self) -> f64 {
        self.width as f64 * FIT_FACTOR * MAX_ZOOM_FACTOR
    }

    /// Zoom normalized so the world-fit radius reads 1.0, matching the flat
    /// viewport's scale for LOD selection and mode toggling.
    pub fn effective_zoom(&self) -> f64 {
        self.radius / (self.width as f64 * FIT_FACTOR)
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn center_lon(&self) -> f64 {
        self.center_lonlat().0
    }

    pub fn center_lat(&self) -> f64 {
        self.center_lonlat().1
    }

    /// Check whether a projected point is (roughly) inside the viewport.
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Rough bounding-box visibility for a line segment.
    pub fn segment_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        p1.0.max(p2.0) >= 0
            && p1.0.min(p2.0) < self.width as i32
            && p1.1.max(p2.1) >= 0
            && p1.1.min(p2.1) < self.height as i32
    }
}

/// Convert lon/lat in degrees to a unit sphere vector.
#[inline(always)]
fn lonlat_to_vec3(lon: f64, lat: f64) -> DVec3 {
    let lon_rad = lon.to_radians();
    let lat_rad = lat.to_radians();
    DVec3::new(
        lat_rad.cos() * lon_rad.cos(),
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_projects_to_screen_center() {
        let globe = GlobeViewport::new(10.0, 45.0, 100.0, 200, 200);
        assert_eq!(globe.project(10.0, 45.0), Some((100, 100)));
    }

    #[test]
    fn antipode_is_culled() {
        let globe = GlobeViewport::new(0.0, 0.0, 100.0, 200, 200);
        assert_eq!(globe.project(180.0, 0.0), None);
    }

    #[test]
    fn unproject_center_hits_globe_center() {
        let globe = GlobeViewport::new(-43.2, -22.9, 100.0, 200, 200);
        let (lon, lat) = globe.unproject(100, 100).unwrap();
        assert!((lon - -43.2).abs() < 0.5);
        assert!((lat - -22.9).abs() < 0.5);
    }

    #[test]
    fn unproject_outside_disk_is_none() {
        let globe = GlobeViewport::new(0.0, 0.0, 50.0, 200, 200);
        assert_eq!(globe.unproject(0, 0), None);
    }

    #[test]
    fn flat_roundtrip_preserves_center_and_zoom() {
        let vp = Viewport::new(37.6, 55.8, 2.0, 200, 160);
        let globe = GlobeViewport::from_flat(&vp);
        let back = globe.to_flat();
        assert!((back.center_lon - 37.6).abs() < 0.01);
        assert!((back.center_lat - 55.8).abs() < 0.01);
        assert!((back.zoom - 2.0).abs() < 0.01);
    }

    #[test]
    fn drag_shifts_center() {
        let mut globe = GlobeViewport::new(0.0, 0.0, 100.0, 200, 200);
        globe.rotate_drag(30, 0);
        assert!(globe.center_lon() > 1.0);
        assert!(globe.center_lat().abs() < 0.5);
    }
}
