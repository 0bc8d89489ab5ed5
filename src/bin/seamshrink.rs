use std::path::PathBuf;
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use image::{DynamicImage, ImageBuffer, Pixel};
use log::{info, LevelFilter};
use seamshrink::{
    compute_energy, energy_to_image, shrink_image, FilterKind, PixelBuffer, SeamError, Size,
};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Seam(#[from] SeamError),
}

fn cli() -> Command {
    Command::new("seamshrink")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Content-aware image shrinking by seam carving")
        .arg(
            Arg::new("input")
                .help("The image to shrink")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Where to write the result; the extension picks the format")
                .short('o')
                .long("output")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("width")
                .help("Target width (defaults to the input width)")
                .long("width")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("height")
                .help("Target height (defaults to the input height)")
                .long("height")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("filter")
                .help("Energy filter: dual-gradient or sobel")
                .long("filter")
                .default_value("dual-gradient")
                .value_parser(|s: &str| s.parse::<FilterKind>()),
        )
        .arg(
            Arg::new("energy")
                .help("Write the energy map of the input instead of carving")
                .long("energy")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .help("More logging; repeat for more")
                .short('v')
                .action(ArgAction::Count),
        )
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn carve<P>(
    image: ImageBuffer<P, Vec<P::Subpixel>>,
    target: Size,
    filter: FilterKind,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, SeamError>
where
    P: Pixel,
{
    shrink_image(&image, target, &filter)
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let input = matches.get_one::<PathBuf>("input").expect("required");
    let output = matches.get_one::<PathBuf>("output").expect("required");
    let filter = *matches.get_one::<FilterKind>("filter").expect("defaulted");

    let image = image::open(input)?;
    info!(
        "read {} ({}x{})",
        input.display(),
        image.width(),
        image.height()
    );

    if matches.get_flag("energy") {
        let buffer = PixelBuffer::from_image(&image.to_rgb8());
        let energy = compute_energy(&buffer, &filter)?;
        energy_to_image(&energy).save(output)?;
        return Ok(());
    }

    let target = Size::new(
        matches
            .get_one::<usize>("width")
            .copied()
            .unwrap_or(image.width() as usize),
        matches
            .get_one::<usize>("height")
            .copied()
            .unwrap_or(image.height() as usize),
    );

    let carved = if image.color().has_alpha() {
        DynamicImage::from(carve(image.to_rgba8(), target, filter)?)
    } else {
        DynamicImage::from(carve(image.to_rgb8(), target, filter)?)
    };
    info!(
        "writing {} ({}x{})",
        output.display(),
        carved.width(),
        carved.height()
    );
    carved.save(output)?;
    Ok(())
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));
    if let Err(err) = run(&matches) {
        eprintln!("seamshrink: {}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn filter_argument_parses() {
        let matches = cli()
            .try_get_matches_from(["seamshrink", "in.png", "-o", "out.png", "--filter", "sobel"])
            .unwrap();
        assert_eq!(
            matches.get_one::<FilterKind>("filter"),
            Some(&FilterKind::Sobel)
        );
        assert!(cli()
            .try_get_matches_from(["seamshrink", "in.png", "-o", "x.png", "--filter", "nope"])
            .is_err());
    }
}
