use clap::Parser;
use handcloud_control::SourceKind;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Hand-driven particle cloud, rendered headless")]
pub struct Args {
    /// Path to config TOML (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stop after this many frames (runs until interrupted when omitted)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Frame rate; 0 runs unthrottled
    #[arg(long)]
    pub fps: Option<f32>,

    /// Shape: christmas-tree, star, fireworks, heart, earth, cube
    #[arg(long)]
    pub shape: Option<String>,

    /// Particle color as #rrggbb
    #[arg(long)]
    pub color: Option<String>,

    /// Number of particles
    #[arg(long)]
    pub count: Option<usize>,

    /// Seed for reproducible clouds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Distance source
    #[arg(long, value_parser = parse_source)]
    pub source: Option<SourceKind>,

    /// Still image or directory of frames for the contour source
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// JSON-lines landmark recording for the landmark source
    #[arg(long)]
    pub landmarks: Option<PathBuf>,

    /// Manual distance in [0, 1]
    #[arg(long)]
    pub distance: Option<f32>,

    /// Write PNG snapshots into this directory
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Snapshot every N frames
    #[arg(long)]
    pub snapshot_every: Option<u64>,
}

fn parse_source(s: &str) -> Result<SourceKind, String> {
    s.parse().map_err(|e: handcloud_control::ControlError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "handcloud",
            "--frames",
            "10",
            "--shape",
            "heart",
            "--source",
            "contour",
            "--snapshot-every",
            "5",
        ])
        .unwrap();
        assert_eq!(args.frames, Some(10));
        assert_eq!(args.shape.as_deref(), Some("heart"));
        assert_eq!(args.source, Some(SourceKind::Contour));
        assert_eq!(args.snapshot_every, Some(5));
    }

    #[test]
    fn test_rejects_unknown_source() {
        assert!(Args::try_parse_from(["handcloud", "--source", "webcam"]).is_err());
    }
}
