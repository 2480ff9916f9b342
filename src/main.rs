// lbxfont-dump: decode a font container and write every font as a PNG atlas,
// optionally with a wrapped sample rendering next to it.
//
//   lbxfont-dump <container> <out-dir> [--sample TEXT] [-v]

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use tracing::{Level, info};

use lbxfont::{FontOptions, Palette, build_atlas, decode_container, print_wrap, wrap_text};

const SAMPLE_WIDTH: u32 = 320;
const SAMPLE_MARGIN: f32 = 4.0;

struct Args {
    container: PathBuf,
    out_dir: PathBuf,
    sample: Option<String>,
    verbose: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut sample = None;
    let mut verbose = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "--sample" => sample = Some(args.next().context("--sample needs a value")?),
            _ => positional.push(arg),
        }
    }

    let [container, out_dir] = <[String; 2]>::try_from(positional).map_err(|_| {
        anyhow::anyhow!("usage: lbxfont-dump <container> <out-dir> [--sample TEXT] [-v]")
    })?;
    Ok(Args { container: container.into(), out_dir: out_dir.into(), sample, verbose })
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let bytes = std::fs::read(&args.container)
        .with_context(|| format!("reading {}", args.container.display()))?;
    let container = decode_container(&bytes)
        .with_context(|| format!("decoding {}", args.container.display()))?;

    if !args.out_dir.is_dir() {
        std::fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("creating {}", args.out_dir.display()))?;
    }

    let palette = Palette::default_font();
    for (index, font) in container.iter().enumerate() {
        if font.max_glyph_width() == 0 || font.height() == 0 {
            info!("font {index} is empty, skipping");
            continue;
        }

        let atlas = build_atlas(font, &palette)?;
        save(atlas.image(), &args.out_dir.join(format!("font-{index}.png")))?;

        if let Some(text) = &args.sample {
            let options = FontOptions::default().with_drop_shadow();
            let max_width = SAMPLE_WIDTH as f32 - 2.0 * SAMPLE_MARGIN;
            let layout = wrap_text(&*atlas, text, max_width, options.scale);
            let height = (layout.total_height + 2.0 * SAMPLE_MARGIN).ceil() as u32;

            let background = Rgba([0x60, 0x50, 0x40, 0xff]);
            let mut canvas = RgbaImage::from_pixel(SAMPLE_WIDTH, height.max(1), background);
            print_wrap(
                &mut canvas,
                &atlas,
                Vec2::splat(SAMPLE_MARGIN),
                max_width,
                &options,
                text,
            );
            save(&canvas, &args.out_dir.join(format!("sample-{index}.png")))?;
        }
    }

    Ok(())
}

fn save(image: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    if image.width() == 0 || image.height() == 0 {
        bail!("refusing to write empty image {}", path.display());
    }
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
