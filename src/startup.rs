//! Interactive `browse` host.
//!
//! Reads one command per line from stdin, turns it into an [`InputEvent`],
//! and carries out the effects the controller returns by printing the page.
//! Photos are fetched and decoded on the rayon pool; results come back over
//! the same channel as the typed commands.

use crossbeam_channel::{RecvTimeoutError, Sender, unbounded};
use log::{debug, error, info, warn};
use photo_albums::config::Settings;
use photo_albums::error::AppError;
use photo_albums::image_loader::{self, LoadedImage};
use photo_albums::image_url;
use photo_albums::services::{CatalogSource, Theme, load_catalog, open_source};
use photo_albums::state::{SortBy, View};
use photo_albums::ui::{self, App, Effect, InputEvent, Key, LoadTicket};
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const HELP: &str = "\
commands:
  left | right | up | down | enter | esc | space    arrow and control keys
  key <c>                 a letter key (f fullscreen, i index, r restart)
  swipe <dx> <dy>         touch gesture in pixels
  click <fraction>        click on the photo, 0.0 = left edge
  background | nav        click the page background / hover the nav
  album <id> | hover <id> open / hover an album
  back | name | count | backdrop | thumb <n>
  search <text> | sort <order> | theme <light|dark> | resize <width>
  goto <fragment>         change the location, e.g. goto trip/3
  show | help | quit";

/// Messages arriving at the browse loop.
enum Message {
    Line(String),
    Input(InputEvent),
    Closed,
}

/// A parsed stdin command.
pub enum Command {
    Event(InputEvent),
    Show,
    Help,
    Quit,
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} expects a number, got {:?}", what, value))
}

/// Parses one line of input.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((line, ""));

    let event = match name.to_ascii_lowercase().as_str() {
        "" | "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        "left" => InputEvent::Key(Key::ArrowLeft),
        "right" => InputEvent::Key(Key::ArrowRight),
        "up" => InputEvent::Key(Key::ArrowUp),
        "down" => InputEvent::Key(Key::ArrowDown),
        "enter" => InputEvent::Key(Key::Enter),
        "esc" | "escape" => InputEvent::Key(Key::Escape),
        "space" => InputEvent::Key(Key::Space),
        "key" => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => InputEvent::Key(Key::Char(c)),
                _ => return Err(format!("key expects a single character, got {:?}", rest)),
            }
        }
        "swipe" => {
            let (dx, dy) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "swipe expects <dx> <dy>".to_string())?;
            InputEvent::Swipe {
                dx: parse_number(dx, "swipe")?,
                dy: parse_number(dy, "swipe")?,
            }
        }
        "click" => InputEvent::PhotoClick {
            fraction: parse_number(rest, "click")?,
        },
        "background" => InputEvent::BackgroundClick,
        "nav" => InputEvent::NavHover,
        "album" => InputEvent::AlbumClick(rest.to_string()),
        "hover" => InputEvent::AlbumHover(rest.to_string()),
        "back" => InputEvent::BackClick,
        "name" => InputEvent::AlbumNameClick,
        "count" => InputEvent::CountClick,
        "backdrop" => InputEvent::BackdropClick,
        "thumb" => InputEvent::ThumbnailClick(parse_number(rest, "thumb")?),
        "search" => InputEvent::SearchInput(rest.to_string()),
        "sort" => InputEvent::SortSelected(rest.parse::<SortBy>()?),
        "theme" => InputEvent::ThemeChanged(rest.parse::<Theme>()?),
        "resize" => InputEvent::Resize(parse_number(rest, "resize")?),
        "goto" => InputEvent::LocationChanged(rest.to_string()),
        other => return Err(format!("unknown command {:?}, try help", other)),
    };
    Ok(Command::Event(event))
}

/// Options of the `browse` subcommand.
pub struct BrowseOptions {
    pub source: String,
    pub fragment: String,
    pub settings: Settings,
}

/// Performs the controller's effects against the terminal.
struct Host {
    source: Arc<dyn CatalogSource>,
    tx: Sender<Message>,
    nav_timer: Sender<(u64, Duration)>,
    location: String,
    fullscreen: bool,
}

impl Host {
    fn new(source: Arc<dyn CatalogSource>, tx: Sender<Message>, fragment: &str) -> Self {
        Self {
            source,
            nav_timer: spawn_nav_timer(tx.clone()),
            tx,
            location: fragment.trim_start_matches('#').to_string(),
            fullscreen: false,
        }
    }

    fn send(&self, event: InputEvent) {
        // The loop owns the receiver; a failed send only happens on shutdown.
        let _ = self.tx.send(Message::Input(event));
    }

    /// Records a location typed by the user, the way the address bar
    /// changes before `hashchange` fires.
    fn typed(&mut self, event: &InputEvent) {
        if let InputEvent::LocationChanged(fragment) = event {
            self.location = fragment.trim_start_matches('#').to_string();
        }
    }

    fn apply(&mut self, app: &App, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::WriteLocation(fragment) => {
                    if fragment != self.location {
                        self.location = fragment.clone();
                        println!("location: #{}", fragment);
                        self.send(InputEvent::LocationChanged(fragment));
                    }
                }
                Effect::Render => render(app),
                Effect::ToggleFullscreen => {
                    self.fullscreen = !self.fullscreen;
                    self.send(InputEvent::FullscreenChanged(self.fullscreen));
                }
                Effect::ExitFullscreen => {
                    if self.fullscreen {
                        self.fullscreen = false;
                        self.send(InputEvent::FullscreenChanged(false));
                    } else {
                        self.send(InputEvent::FullscreenRejected("not in fullscreen".into()));
                    }
                }
                Effect::LoadPhoto { ticket, url } => {
                    debug!("Loading {}", url);
                    self.load(ticket);
                }
                Effect::Preload(srcsets) => debug!("Preloading {} photos", srcsets.len()),
                Effect::Prefetch(srcsets) => debug!("Prefetching {} photos", srcsets.len()),
                Effect::ShowNav => debug!("Nav shown"),
                Effect::HideNav => debug!("Nav hidden"),
                Effect::ScheduleNavHide { timer, delay } => {
                    if self.nav_timer.send((timer, delay)).is_err() {
                        warn!("Nav timer stopped, nav {} stays visible", timer);
                    }
                }
                Effect::ScrollIntoView(number) => debug!("Scrolled to thumbnail {}", number),
                Effect::AmbientChanged { color, transition } => {
                    println!("ambient: {} ({})", color, transition);
                }
                Effect::AmbientReset { .. } => println!("ambient: reset"),
            }
        }
    }

    /// Fetches and decodes the photo of `ticket` on the rayon pool.
    fn load(&self, ticket: LoadTicket) {
        let Some((id, filename)) = image_url::split_photo_path(&ticket.path) else {
            warn!("Not a photo path: {}", ticket.path);
            return;
        };
        let filename = filename.to_string();
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        rayon::spawn(move || {
            let decoded = source
                .photo_bytes(&id, &filename)
                .map_err(AppError::from)
                .and_then(|bytes| image_loader::load_image_from_bytes(&bytes));
            match decoded {
                Ok(image) => {
                    let _ = tx.send(Message::Input(InputEvent::ImageLoaded {
                        ticket,
                        image: LoadedImage::Decoded(image),
                    }));
                }
                Err(e) => error!("Failed to load {}: {}", ticket.path, e),
            }
        });
    }
}

fn render(app: &App) {
    let state = app.state();
    let meta = ui::page_metadata(state);
    println!("== {} ==", meta.title);
    if !meta.og_image.is_empty() {
        debug!(
            "og:image {} ({}x{})",
            meta.og_image, meta.og_image_width, meta.og_image_height
        );
    }

    match state.view.view() {
        View::Index => {
            let (albums, photos) = ui::index_counts(state);
            println!(
                "{} albums, {} photos, sorted by {}",
                albums,
                photos,
                state.view.sort_by().label()
            );
            if !state.view.search_query().is_empty() {
                println!("search: {}", state.view.search_query());
            }
            let selected = state.view.selected_album_index();
            for position in state.visible_albums() {
                let Some(id) = state.listing.get(position) else {
                    continue;
                };
                let Some(album) = state.catalog.get(id) else {
                    continue;
                };
                let marker = if selected == Some(position) { '>' } else { ' ' };
                println!("{} {} ({})", marker, album.name, album.photo_count());
                let cover = image_url::cover_image(&state.settings.cdn_base, id, album);
                if let Some((src, _)) = cover {
                    debug!("cover {}", src);
                }
            }
        }
        View::Viewer => {
            let counter = ui::photo_counter(state).unwrap_or_default();
            let album = state
                .view
                .current_album()
                .and_then(|id| state.catalog.get(id));
            let Some(album) = album else {
                return;
            };
            match album.photo(state.view.current_photo()) {
                Some(photo) if photo.is_portrait() => {
                    println!("{} {} portrait", photo.filename(), counter)
                }
                Some(photo) => println!("{} {}", photo.filename(), counter),
                None => println!("(no photos) {}", counter),
            }
            if state.view.overlay_open() {
                let selected = state.view.selected_overlay_index();
                for (index, photo) in album.photos.iter().enumerate() {
                    let number = index + 1;
                    let marker = if selected == Some(number) { '>' } else { ' ' };
                    println!("  {} {:>3} {}", marker, number, photo.filename());
                    if let Some(id) = state.view.current_album() {
                        debug!(
                            "thumbnail {}",
                            image_url::thumbnail_url(&state.settings.cdn_base, id, photo)
                        );
                    }
                }
            }
        }
    }
}

/// Runs the nav auto-hide timer. A new schedule replaces the pending one,
/// since the controller only honors the newest timer id anyway.
fn spawn_nav_timer(tx: Sender<Message>) -> Sender<(u64, Duration)> {
    let (timer_tx, timer_rx) = unbounded::<(u64, Duration)>();
    thread::spawn(move || {
        let mut pending: Option<(u64, Instant)> = None;
        loop {
            let scheduled = match pending {
                Some((timer, deadline)) => match timer_rx.recv_deadline(deadline) {
                    Ok(scheduled) => scheduled,
                    Err(RecvTimeoutError::Timeout) => {
                        pending = None;
                        let elapsed = InputEvent::NavHideElapsed(timer);
                        if tx.send(Message::Input(elapsed)).is_err() {
                            return;
                        }
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => return,
                },
                None => match timer_rx.recv() {
                    Ok(scheduled) => scheduled,
                    Err(_) => return,
                },
            };
            let (timer, delay) = scheduled;
            pending = Some((timer, Instant::now() + delay));
        }
    });
    timer_tx
}

fn spawn_stdin_reader(tx: Sender<Message>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Message::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        let _ = tx.send(Message::Closed);
    });
}

/// Loads the catalog and runs the interactive loop until stdin closes.
pub fn run_browse(options: BrowseOptions) -> Result<(), Box<dyn std::error::Error>> {
    let source: Arc<dyn CatalogSource> = Arc::from(open_source(&options.source)?);
    let catalog = match load_catalog(source.as_ref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load albums from {}: {}", source.describe(), e);
            println!("Error loading albums. Please try again later.");
            return Err(e.into());
        }
    };

    let mut app = App::new(catalog, options.settings);
    let (tx, rx) = unbounded();
    spawn_stdin_reader(tx.clone());

    let mut host = Host::new(source, tx, &options.fragment);
    let effects = app.start(&options.fragment);
    host.apply(&app, effects);

    for message in rx.iter() {
        let event = match message {
            Message::Closed => break,
            Message::Input(event) => event,
            Message::Line(line) => match parse_command(&line) {
                Ok(Command::Event(event)) => {
                    host.typed(&event);
                    event
                }
                Ok(Command::Show) => {
                    render(&app);
                    continue;
                }
                Ok(Command::Help) => {
                    println!("{}", HELP);
                    continue;
                }
                Ok(Command::Quit) => break,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            },
        };
        let effects = app.dispatch(event);
        host.apply(&app, effects);
    }

    info!("Leaving at #{}", host.location);
    Ok(())
}
