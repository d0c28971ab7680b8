//! `fontdump <font file> [--index N] [codes...]`
//!
//! Prints what the library makes of a font program: its format, glyph count
//! and, for each code, the glyph it selects, its advance, Unicode text and
//! outline bounds. Without codes, every printable ASCII code the font can
//! display is listed. Set `RUST_LOG=pdf_fonts=debug` for parser diagnostics

use std::sync::Arc;

use pdf_fonts::{Font, FontOptions};

#[derive(Debug, Default)]
struct Args {
    path: Option<String>,
    index: u32,
    codes: Vec<u16>,
}

fn parse_code(arg: &str) -> anyhow::Result<u16> {
    Ok(match arg.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16)?,
        None => match arg.chars().collect::<Vec<_>>().as_slice() {
            // a single character stands for its own code
            [c] if !c.is_ascii_digit() => u16::try_from(u32::from(*c))?,
            _ => arg.parse()?,
        },
    })
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--index" => match iter.next() {
                Some(index) => args.index = index.parse()?,
                None => anyhow::bail!("--index expects a number"),
            },
            _ if args.path.is_none() => args.path = Some(arg),
            _ => args.codes.push(parse_code(&arg)?),
        }
    }

    Ok(args)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let path = match args.path {
        Some(path) => path,
        None => anyhow::bail!("usage: fontdump <font file> [--index N] [codes...]"),
    };

    let data: Arc<[u8]> = Arc::from(std::fs::read(&path)?);
    let font = Font::parse_at(data, args.index, &FontOptions::default())?;

    println!("{}: {} font, {} glyphs", path, font.format().as_str(), font.num_glyphs());

    let codes = if args.codes.is_empty() {
        (0x20..0x7f).filter(|&code| font.can_display(code)).collect()
    } else {
        args.codes
    };

    for code in codes {
        let glyph = font.code_to_glyph_outline(code);
        let bbox = glyph.outline.bounding_box();

        let bounds = if bbox.is_empty() {
            "-".to_owned()
        } else {
            format!("[{} {} {} {}]", bbox.min.x, bbox.min.y, bbox.max.x, bbox.max.y)
        };

        println!(
            "{:#06x} gid {:>5} width {:>8.2} text {:?} paths {} bbox {}",
            code,
            font.glyph_id(code),
            font.advance_width(code),
            font.to_unicode(code).unwrap_or_default(),
            glyph.outline.paths.len(),
            bounds,
        );
    }

    Ok(())
}
