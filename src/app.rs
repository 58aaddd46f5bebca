use crate::map::{MapRenderer, Projection};

/// Character width of the detail panel when a selection is open. The view
/// size math and the layout split must agree on this.
pub const PANEL_WIDTH: u16 = 42;

/// An open detail panel: which markers are selected and how far the panel
/// has scrolled.
pub struct Selection {
    /// Indices into the renderer's marker list (all members of the picked
    /// cluster)
    pub members: Vec<usize>,
    pub scroll: u16,
}

/// Application state
pub struct App {
    pub projection: Projection,
    pub map_renderer: MapRenderer,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the cursor crosshair
    pub mouse_pos: Option<(u16, u16)>,
    /// Open detail panel, if any
    pub selection: Option<Selection>,
    /// Tab-cycling cursor over the marker list
    cycle: Option<usize>,
    /// Terminal dimensions, kept so the projection can resize when the
    /// detail panel opens or closes
    term_width: usize,
    term_height: usize,
}

impl App {
    pub fn new(width: usize, height: usize) -> Self {
        let mut app = Self {
            projection: Projection::world(0, 0),
            map_renderer: MapRenderer::new(),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            selection: None,
            cycle: None,
            term_width: width,
            term_height: height,
        };
        app.sync_view_size();
        app
    }

    /// Update viewport size when the terminal resizes.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.term_width = width;
        self.term_height = height;
        self.sync_view_size();
    }

    /// Braille pixel dimensions of the map area: inside the frame border,
    /// above the status bar, left of the detail panel when one is open.
    fn view_pixels(&self) -> (usize, usize) {
        let panel = if self.selection.is_some() {
            PANEL_WIDTH as usize
        } else {
            0
        };
        let inner_width = self.term_width.saturating_sub(2 + panel);
        let inner_height = self.term_height.saturating_sub(3);
        (inner_width * 2, inner_height * 4)
    }

    /// Keep the projection sized to the visible map area so picking and
    /// rendering agree.
    fn sync_view_size(&mut self) {
        let (pixel_width, pixel_height) = self.view_pixels();
        self.projection.set_size(pixel_width, pixel_height);
    }

    /// Pan the map / rotate the globe.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.projection.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.projection.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.projection.zoom_out();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.projection.zoom_in_at(px, py);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.projection.zoom_out_at(px, py);
    }

    /// Switch between the flat map and the globe, keeping center and zoom.
    pub fn toggle_globe(&mut self) {
        self.projection = self.projection.toggled();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Pick at a terminal cell: select the cluster under the cursor or close
    /// the panel when the click lands on open water.
    pub fn select_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.selection = self
            .map_renderer
            .hit_test(px, py, &self.projection)
            .map(|members| Selection { members, scroll: 0 });
        self.sync_view_size();
    }

    /// Advance the Tab cursor through the marker list, recentering the view
    /// and opening the panel for the newly selected marker.
    pub fn cycle_marker(&mut self, step: i64) {
        let count = self.map_renderer.markers.len();
        if count == 0 {
            return;
        }

        let next = match self.cycle {
            Some(current) => (current as i64 + step).rem_euclid(count as i64) as usize,
            None if step >= 0 => 0,
            None => count - 1,
        };
        self.cycle = Some(next);

        let marker = &self.map_renderer.markers[next];
        let (lon, lat) = (marker.lon, marker.lat);
        self.selection = Some(Selection {
            members: vec![next],
            scroll: 0,
        });
        self.sync_view_size();
        self.projection.center_on(lon, lat);
    }

    /// Close the detail panel.
    pub fn close_panel(&mut self) {
        self.selection = None;
        self.sync_view_size();
    }

    pub fn scroll_panel(&mut self, delta: i32) {
        if let Some(selection) = &mut self.selection {
            selection.scroll = selection.scroll.saturating_add_signed(delta as i16);
        }
    }

    /// Handle mouse drag: pan/rotate by the cell delta since the last event.
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            // Cell deltas are coarse; scale to braille pixels, gentler when
            // zoomed out
            let scale = if self.projection.zoom() < 2.0 {
                2
            } else if self.projection.zoom() < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when the mouse button is released.
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Track the mouse for the cursor crosshair.
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Mouse position in braille pixels, for rendering the crosshair.
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| cell_to_pixel(col, row))
    }

    /// Status line: current zoom.
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.projection.zoom())
    }

    /// Status line: current center coordinates.
    pub fn center_coords(&self) -> String {
        let (lon, lat) = self.projection.center();
        format!(
            "{:.1}°{}, {:.1}°{}",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" },
        )
    }

    /// Status line: view mode name.
    pub fn mode_name(&self) -> &'static str {
        if self.projection.is_globe() {
            "Globe"
        } else {
            "Map"
        }
    }
}

/// Terminal cell to braille pixel, accounting for the one-cell border.
fn cell_to_pixel(col: u16, row: u16) -> (i32, i32) {
    let px = (col.saturating_sub(1)) as i32 * 2;
    let py = (row.saturating_sub(1)) as i32 * 4;
    (px, py)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Marker;

    fn app_with_markers(count: usize) -> App {
        let mut app = App::new(80, 40);
        let markers = (0..count)
            .map(|i| Marker {
                lon: i as f64 * 30.0 - 60.0,
                lat: i as f64 * 10.0,
                location: Some(format!("loc{i}")),
                headline: None,
                summaries: vec![format!("summary {i}")],
            })
            .collect();
        app.map_renderer.set_markers(markers);
        app
    }

    #[test]
    fn cycle_wraps_both_directions() {
        let mut app = app_with_markers(3);
        app.cycle_marker(1);
        app.cycle_marker(1);
        app.cycle_marker(1);
        app.cycle_marker(1); // wraps to 0
        assert_eq!(app.selection.as_ref().unwrap().members, vec![0]);

        app.cycle_marker(-1); // wraps back to 2
        assert_eq!(app.selection.as_ref().unwrap().members, vec![2]);
    }

    #[test]
    fn cycle_recenters_view() {
        let mut app = app_with_markers(2);
        app.cycle_marker(1);
        let (lon, lat) = app.projection.center();
        assert!((lon - -60.0).abs() < 0.01);
        assert!(lat.abs() < 0.01);
    }

    #[test]
    fn cycle_with_no_markers_is_a_noop() {
        let mut app = app_with_markers(0);
        app.cycle_marker(1);
        assert!(app.selection.is_none());
    }

    #[test]
    fn toggle_globe_roundtrips_mode() {
        let mut app = app_with_markers(0);
        assert_eq!(app.mode_name(), "Map");
        app.toggle_globe();
        assert_eq!(app.mode_name(), "Globe");
        app.toggle_globe();
        assert_eq!(app.mode_name(), "Map");
    }

    #[test]
    fn select_on_empty_water_clears_selection() {
        let mut app = app_with_markers(1);
        app.cycle_marker(1);
        assert!(app.selection.is_some());
        // Far corner of the map, nowhere near the marker
        app.select_at(2, 2);
        assert!(app.selection.is_none());
    }

    #[test]
    fn panel_scroll_saturates_at_zero() {
        let mut app = app_with_markers(1);
        app.cycle_marker(1);
        app.scroll_panel(-5);
        assert_eq!(app.selection.as_ref().unwrap().scroll, 0);
        app.scroll_panel(3);
        assert_eq!(app.selection.as_ref().unwrap().scroll, 3);
    }
}
