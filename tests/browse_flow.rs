use image::{Rgb, RgbImage};
use photo_albums::config::Settings;
use photo_albums::image_loader::{self, LoadedImage};
use photo_albums::services::{DirectorySource, Theme, generate_manifests, load_catalog};
use photo_albums::state::View;
use photo_albums::ui::{App, Effect, InputEvent, Key, LoadTicket};
use std::fs;
use std::path::Path;

/// Builds an albums folder with solid-color photos and generated manifests.
fn albums_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let photos: [(&str, &str, [u8; 3]); 4] = [
        ("summer", "1.png", [200, 150, 100]),
        ("summer", "2.png", [20, 40, 200]),
        ("summer", "3.png", [0, 0, 0]),
        ("winter", "a.png", [240, 240, 240]),
    ];
    for (album, file, color) in photos {
        let folder = dir.path().join(album);
        fs::create_dir_all(&folder).unwrap();
        RgbImage::from_pixel(16, 12, Rgb(color))
            .save(folder.join(file))
            .unwrap();
    }
    generate_manifests(dir.path()).unwrap();
    dir
}

fn app(root: &Path) -> App {
    let catalog = load_catalog(&DirectorySource::new(root)).unwrap();
    App::new(catalog, Settings::default())
}

fn ticket(effects: &[Effect]) -> LoadTicket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LoadPhoto { ticket, .. } => Some(ticket.clone()),
            _ => None,
        })
        .expect("photo load")
}

fn decode(root: &Path, ticket: &LoadTicket) -> LoadedImage {
    let relative = ticket.path.trim_start_matches("/albums/");
    LoadedImage::Decoded(image_loader::load_image_blocking(&root.join(relative)).unwrap())
}

#[test]
fn deep_link_loads_photo_and_lights_the_page() {
    let dir = albums_dir();
    let mut app = app(dir.path());

    let effects = app.start("#summer/1");
    assert_eq!(app.state().view.view(), View::Viewer);
    let first = ticket(&effects);
    assert_eq!(first.path, "/albums/summer/1.png");

    let image = decode(dir.path(), &first);
    let effects = app.dispatch(InputEvent::ImageLoaded { ticket: first, image });
    assert_eq!(effects.len(), 1);
    assert_eq!(
        app.ambient().background().unwrap().to_string(),
        "hsl(30, 24%, 89.15%)"
    );

    app.dispatch(InputEvent::ThemeChanged(Theme::Dark));
    assert_eq!(
        app.ambient().background().unwrap().to_string(),
        "hsl(30, 12%, 10%)"
    );
}

#[test]
fn out_of_order_loads_keep_the_newest_color() {
    let dir = albums_dir();
    let mut app = app(dir.path());

    let first = ticket(&app.start("summer/1"));
    let second = ticket(&app.dispatch(InputEvent::Key(Key::ArrowRight)));
    let second_image = decode(dir.path(), &second);
    let first_image = decode(dir.path(), &first);

    app.dispatch(InputEvent::ImageLoaded {
        ticket: second,
        image: second_image,
    });
    let newest = app.ambient().background();
    assert!(newest.is_some());

    let effects = app.dispatch(InputEvent::ImageLoaded {
        ticket: first,
        image: first_image,
    });
    assert!(effects.is_empty());
    assert_eq!(app.ambient().background(), newest);
}

#[test]
fn walking_off_the_end_returns_to_index() {
    let dir = albums_dir();
    let mut app = app(dir.path());
    app.start("");

    let effects = app.dispatch(InputEvent::AlbumClick("summer".into()));
    assert!(effects.contains(&Effect::WriteLocation("summer/1".into())));

    let mut locations = Vec::new();
    for _ in 0..3 {
        for effect in app.dispatch(InputEvent::Key(Key::ArrowRight)) {
            if let Effect::WriteLocation(fragment) = effect {
                locations.push(fragment);
            }
        }
    }
    assert_eq!(locations, vec!["summer/2", "summer/3", ""]);
    assert_eq!(app.state().view.view(), View::Index);
    assert_eq!(app.ambient().background(), None);
}

#[test]
fn unknown_deep_link_stays_on_index() {
    let dir = albums_dir();
    let mut app = app(dir.path());
    let effects = app.start("doesNotExist/1");
    assert_eq!(app.state().view.view(), View::Index);
    assert!(!effects.iter().any(|e| matches!(e, Effect::LoadPhoto { .. })));
}
