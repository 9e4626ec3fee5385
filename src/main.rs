//! `photo-albums` command-line host.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use photo_albums::config::{DEFAULT_SITE_TITLE, Settings};
use photo_albums::image_loader;
use photo_albums::services::ambient_service::{self, Theme};
use photo_albums::services::manifest_service;
use std::path::PathBuf;

mod startup;

/// Photo album browser: manifests, ambient colors and an interactive viewer.
#[derive(Debug, Parser)]
#[command(name = "photo-albums", version, about, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write albums.json and every <album>/photos.json below a folder.
    Generate {
        /// Folder holding one sub-folder per album.
        #[arg(value_name = "DIR")]
        albums_dir: PathBuf,
    },
    /// Print the ambient background color of an image.
    Ambient {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// light or dark
        #[arg(long, default_value = "light")]
        theme: Theme,
    },
    /// Browse a catalog interactively, one command per line on stdin.
    Browse {
        /// Albums folder or http(s) base URL holding albums.json.
        #[arg(value_name = "SOURCE")]
        source: String,
        /// Initial location, e.g. "trip/3".
        #[arg(long, default_value = "")]
        fragment: String,
        /// Image CDN base URL.
        #[arg(long, env = "PHOTO_ALBUMS_CDN", default_value = "")]
        cdn: String,
        /// Site title.
        #[arg(long, env = "PHOTO_ALBUMS_TITLE", default_value = DEFAULT_SITE_TITLE)]
        title: String,
        /// Viewport width used for the grid column count.
        #[arg(long, default_value_t = 1280)]
        width: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    match Cli::parse().command {
        Command::Generate { albums_dir } => {
            let albums = manifest_service::generate_manifests(&albums_dir)?;
            for album in &albums {
                println!("{} ({} photos)", album.id, album.photo_count);
            }
        }
        Command::Ambient { image, theme } => {
            let decoded = image_loader::load_image_blocking(&image)?;
            let color = ambient_service::ambient_color(&decoded, theme)?;
            println!("{}", color);
        }
        Command::Browse {
            source,
            fragment,
            cdn,
            title,
            width,
        } => startup::run_browse(startup::BrowseOptions {
            source,
            fragment,
            settings: Settings {
                cdn_base: cdn.trim_end_matches('/').to_string(),
                site_title: title,
                viewport_width: width,
            },
        })?,
    }

    Ok(())
}
