mod app;
mod braille;
mod data;
mod map;
mod news;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use map::markers_from_records;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal map and globe visualization of geotagged news summaries
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the summarized news JSON file
    #[arg(default_value = "data/news.json")]
    news_file: PathBuf,

    /// Directory holding Natural Earth basemap GeoJSON
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Start on the 3D globe instead of the flat map
    #[arg(short, long)]
    globe: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load the news before touching the terminal so the one error line on
    // failure stays readable. A failed load means an empty map, not a crash.
    let markers = match news::load_news(&args.news_file) {
        Ok(records) => markers_from_records(&records),
        Err(e) => {
            eprintln!("Error loading news data: {e:#}");
            Vec::new()
        }
    };

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &args, markers);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for panning, zooming and marker picking
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for the cursor crosshair
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel zooms towards the cursor
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll pans (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click picks a marker; drag pans the map / rotates the globe
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
            app.select_at(mouse.column, mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.quit(),
        // Esc closes the detail panel first, then quits
        KeyCode::Esc => {
            if app.selection.is_some() {
                app.close_panel();
            } else {
                app.quit();
            }
        }

        // Scroll the panel when it is open, otherwise pan
        KeyCode::Up | KeyCode::Char('k') => {
            if app.selection.is_some() {
                app.scroll_panel(-1);
            } else {
                app.pan(0, -6);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selection.is_some() {
                app.scroll_panel(1);
            } else {
                app.pan(0, 6);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Projection and layer toggles
        KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_globe(),
        KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.map_renderer.toggle_coastlines(),
        KeyCode::Char('L') => app.map_renderer.toggle_labels(),
        KeyCode::Char('o') | KeyCode::Char('O') => app.map_renderer.toggle_overlay(),

        // Cycle through markers
        KeyCode::Tab | KeyCode::Char('n') => app.cycle_marker(1),
        KeyCode::BackTab | KeyCode::Char('p') => app.cycle_marker(-1),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, args: &Args, markers: Vec<map::Marker>) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize);
    app.map_renderer.set_markers(markers);
    if args.globe {
        app.toggle_globe();
    }

    // Basemap context under the markers; fall back to the built-in outline
    if args.data_dir.exists() {
        let _ = data::load_basemap(&mut app.map_renderer, &args.data_dir);
    }
    if !app.map_renderer.has_basemap() {
        data::generate_simple_world(&mut app.map_renderer);
    }

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        // Reset view
                        if key.code == KeyCode::Char('r') || key.code == KeyCode::Char('0') {
                            let size = terminal.size()?;
                            let markers = std::mem::take(&mut app.map_renderer.markers);
                            app = App::new(size.width as usize, size.height as usize);
                            app.map_renderer.set_markers(markers);
                            if args.data_dir.exists() {
                                let _ = data::load_basemap(&mut app.map_renderer, &args.data_dir);
                            }
                            if !app.map_renderer.has_basemap() {
                                data::generate_simple_world(&mut app.map_renderer);
                            }
                        } else {
                            handle_key(&mut app, key.code);
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
