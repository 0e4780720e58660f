use clap::{Parser, Subcommand};

mod handlers;

pub use handlers::*;

use crate::metadata::ThumbnailTier;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the video identifier found in a link
    Id {
        /// A video link
        #[clap(allow_hyphen_values = true)]
        url: String,
    },
    /// Fetch title, description, channel, tags and thumbnails of a video
    Fetch {
        /// A video link
        #[clap(allow_hyphen_values = true)]
        url: String,

        /// Also print which providers answered (to stderr)
        #[clap(long, default_value = "false")]
        report: bool,
    },
    /// Print thumbnail urls for every tier
    Thumbnails {
        /// A video link
        #[clap(allow_hyphen_values = true)]
        url: String,
    },
    /// Download one thumbnail tier to a file
    Download {
        /// A video link
        #[clap(allow_hyphen_values = true)]
        url: String,

        /// default, medium, high, standard or maxres
        #[clap(short, long, default_value = "maxres")]
        tier: ThumbnailTier,

        /// Target file. Defaults to `<id>-<tier>.jpg` in the current directory
        #[clap(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Start vidmeta as a service.
    Daemon {
        /// Address to listen on, overrides `listen_addr` from config.yaml
        #[clap(short, long)]
        listen: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_download_args() {
        let args = Args::try_parse_from([
            "vidmeta",
            "download",
            "https://youtu.be/dQw4w9WgXcQ",
            "--tier",
            "high",
        ])
        .unwrap();

        match args.command {
            Command::Download { url, tier, output } => {
                assert_eq!(url, "https://youtu.be/dQw4w9WgXcQ");
                assert_eq!(tier, ThumbnailTier::High);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_tier() {
        let res = Args::try_parse_from([
            "vidmeta",
            "download",
            "https://youtu.be/dQw4w9WgXcQ",
            "--tier",
            "huge",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_fetch_defaults() {
        let args = Args::try_parse_from(["vidmeta", "fetch", "https://youtu.be/dQw4w9WgXcQ"]).unwrap();
        assert!(matches!(args.command, Command::Fetch { report: false, .. }));
    }
}
