use std::{
    fs::{create_dir_all, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use accessibility::{
    amenities::{merge, overpass, AmenityCsv, AmenitySource, Overpass},
    config::{ScoreArgs, ScoreSettings},
    score::score_centroids_with_progress,
    table,
    utils::{agent, progress_bar},
    GeoPoint,
};

#[derive(Debug, Parser)]
#[command(version, about = "Gravity-model accessibility scores for zone centroids")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every centroid against an amenities table
    Score(ScoreArgs),
    /// Download named amenities around a point from Overpass
    Download(DownloadArgs),
    /// Concatenate amenity tables
    Merge(MergeArgs),
}

#[derive(Debug, Args)]
struct DownloadArgs {
    /// OSM amenity tag value, repeat for several files
    #[arg(
        long = "amenity-type",
        default_value = "hospital",
        value_parser = overpass::parse_amenity_type
    )]
    amenity_types: Vec<String>,
    #[arg(long, default_value_t = 14.673671, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, default_value_t = 121.045322, allow_negative_numbers = true)]
    lon: f64,
    /// Search radius in metres
    #[arg(long, default_value_t = 10000)]
    radius: u32,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Comma separated amenity tables
    files: String,
    #[arg(short, long, default_value = "amenities.csv")]
    output: PathBuf,
    /// Keep only the first row per id and amenity type
    #[arg(long)]
    dedup: bool,
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    match cli.command {
        Command::Score(args) => score(ScoreSettings::resolve(args)?),
        Command::Download(args) => download(args),
        Command::Merge(args) => merge_files(args),
    }
}

fn score(settings: ScoreSettings) -> Result<()> {
    let amenities = AmenityCsv(settings.amenities.clone()).amenities()?;
    let centroids = table::load_centroids(&settings.centroids, &settings.columns)?;
    info!(
        "Scoring {} centroids against {} amenities (max study area {} km, coeff {}, {:?}, {:?})",
        centroids.len(),
        amenities.len(),
        settings.scoring.max_study_area(),
        settings.scoring.coeff(),
        settings.scoring.normalization,
        settings.scoring.execution,
    );

    let results = score_centroids_with_progress(
        &centroids,
        &amenities,
        &settings.scoring,
        progress_bar(centroids.len() as u64),
    );
    let reachable = results.iter().filter(|x| x.num_amenities > 0).count();
    info!("{reachable} of {} centroids reach an amenity", results.len());

    if settings.output == Path::new("-") {
        table::write_scores(io::stdout().lock(), &results)?;
    } else {
        table::write_scores(create(&settings.output)?, &results)?;
        info!("Saved file to {}", settings.output.display());
    }
    Ok(())
}

fn download(args: DownloadArgs) -> Result<()> {
    let center = GeoPoint::validate("origin", args.lat, args.lon)?;
    let agent = agent();
    create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    for amenity_type in args.amenity_types {
        let path = args.out_dir.join(format!("{amenity_type}.csv"));
        let source = Overpass {
            agent: agent.clone(),
            amenity_type,
            center,
            radius: args.radius,
        };
        let amenities = source.amenities()?;

        table::write_amenities(create(&path)?, &amenities)?;
        info!("Saved file to {}", path.display());
    }
    Ok(())
}

fn merge_files(args: MergeArgs) -> Result<()> {
    let files = merge::split_files(&args.files);
    let records = merge::merge(&files, args.dedup)?;

    table::write_amenity_records(create(&args.output)?, &records)?;
    info!(
        "Merged {} files ({} rows) to {}",
        files.len(),
        records.len(),
        args.output.display()
    );
    Ok(())
}

fn create(path: &Path) -> Result<impl Write> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_rejects_unsafe_amenity_types() {
        let cli = Cli::try_parse_from(["accessibility", "download", "--amenity-type", "school"]);
        assert!(matches!(
            cli.map(|x| x.command),
            Ok(Command::Download(DownloadArgs { amenity_types, .. })) if amenity_types == ["school"]
        ));

        for bad in ["../school", "school\"]", "a/b"] {
            assert!(
                Cli::try_parse_from(["accessibility", "download", "--amenity-type", bad]).is_err()
            );
        }
    }
}
