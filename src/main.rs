use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tps_palettes::cli::{Args, Command};
use tps_palettes::model::{reduce, Action, ColorPalette, IdAllocator};
use tps_palettes::pipeline::extract::{clamp_count, extract_palette_colors, load_image};
use tps_palettes::prefs::Preferences;
use tps_palettes::tps::{
    color_palette_xml, parse_color_palette, parse_tps_file, replace_palettes_in_tps_xml,
    PaletteXml, ParsedPalette, TpsFileError,
};
use tps_palettes::{palette_type, tui};

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    match args.command {
        Command::Extract {
            image,
            colors,
            name,
            r#type,
        } => extract(&image, colors, name, r#type),
        Command::Import { file } => import(&file),
        Command::Export {
            tps,
            palettes,
            output,
        } => export(&tps, &palettes, output.as_deref()),
        Command::Edit { file } => tui::run(tui::TuiApp::open(&file)?),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn extract(image: &Path, colors: Option<usize>, name: Option<String>, type_id: String) -> Result<()> {
    let mut prefs = Preferences::load();
    let count = clamp_count(colors.unwrap_or_else(|| prefs.extract_count()));
    if colors.is_some() {
        prefs.set_extract_count(count);
        if let Err(e) = prefs.save() {
            warn!("could not remember colour count: {e:#}");
        }
    }

    let img = load_image(image)?;
    let hexes = extract_palette_colors(&img, count);

    let name = name.unwrap_or_else(|| {
        image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let mut ids = IdAllocator::new();
    let palette = reduce(
        ColorPalette::new(&mut ids),
        &Action::ReplacePalette {
            name: Some(name),
            type_id: Some(type_id),
            colors: hexes,
        },
        &mut ids,
    );
    println!("{}", color_palette_xml(&PaletteXml::from(&palette)));
    Ok(())
}

fn import(file: &Path) -> Result<()> {
    let xml = read(file)?;
    let palettes = match parse_tps_file(&xml) {
        Ok(palettes) => palettes,
        Err(TpsFileError::NotWorkbook(_)) => match parse_color_palette(&xml) {
            Ok(palette) => vec![palette],
            Err(e) => bail!("{}: {e}", file.display()),
        },
        Err(TpsFileError::InvalidPalettes(errors)) => {
            for e in &errors {
                eprintln!("{}: {e}", e.palette_name.as_deref().unwrap_or("<unnamed>"));
            }
            bail!("{}: {} palette(s) failed validation", file.display(), errors.len());
        }
        Err(e) => bail!("{}: {e}", file.display()),
    };

    for palette in &palettes {
        print_summary(palette);
    }
    Ok(())
}

fn print_summary(palette: &ParsedPalette) {
    let resolved = palette_type::find(&palette.type_id).unwrap_or_else(|| {
        warn!(type_id = %palette.type_id, palette = %palette.name, "unrecognised palette type, using the default");
        palette_type::PaletteType::default_type()
    });
    println!(
        "{} [{}] {} colour(s): {}",
        palette.name,
        resolved,
        palette.colors.len(),
        palette.colors.join(" ")
    );
}

fn export(tps: &Path, fragments: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let xml = read(tps)?;

    let mut parsed = Vec::with_capacity(fragments.len());
    for path in fragments {
        let fragment = read(path)?;
        match parse_color_palette(&fragment) {
            Ok(palette) => parsed.push(palette),
            Err(e) => bail!("{}: {e}", path.display()),
        }
    }
    let palettes: Vec<PaletteXml<'_>> = parsed.iter().map(PaletteXml::from).collect();

    let updated = match replace_palettes_in_tps_xml(&xml, &palettes) {
        Ok(updated) => updated,
        Err(e) => bail!("{}: {e}", tps.display()),
    };

    match output {
        Some(path) => std::fs::write(path, updated)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{updated}"),
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
