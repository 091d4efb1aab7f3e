use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "composite-calc")]
#[command(about = "Cloud-masked spectral index composites from satellite scene collections")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Destination folder for exported composites
    #[arg(short, long, default_value = "composites", global = true)]
    pub folder: PathBuf,

    /// Maximum scene cloud cover percentage
    #[arg(long, default_value = "10.0", global = true)]
    pub cloud_cover: f64,

    /// Ground sample distance of the exports, in CRS units
    #[arg(long, default_value = "10.0", global = true)]
    pub scale: f64,

    /// Pixel budget per export (width x height x bands)
    #[arg(long, default_value = "10000000000000", global = true)]
    pub max_pixels: u64,

    /// Compression for exported GeoTIFFs (DEFLATE, ZSTD, LZW, NONE)
    #[arg(long, default_value = "DEFLATE", global = true)]
    pub compress: String,

    /// Compression level
    #[arg(long, default_value = "6", global = true)]
    pub compress_level: u8,

    /// I/O worker threads for scene reading
    #[arg(long, global = true)]
    pub io_threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Landsat-8 Collection 2 Level-2 composites
    Landsat8 {
        /// Vector boundary file delimiting the area of interest
        #[arg(short, long)]
        aoi: PathBuf,

        /// Scene manifest (JSON: id, path, date, cloud_cover per scene)
        #[arg(short, long)]
        manifest: PathBuf,

        /// First acquisition date, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Last acquisition date, exclusive (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,
    },

    /// Sentinel-2 surface reflectance composites
    Sentinel2 {
        /// Vector boundary file delimiting the area of interest
        #[arg(short, long)]
        aoi: PathBuf,

        /// Scene manifest (JSON: id, path, date, cloud_cover per scene)
        #[arg(short, long)]
        manifest: PathBuf,

        /// First acquisition date, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Last acquisition date, exclusive (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,
    },
}
