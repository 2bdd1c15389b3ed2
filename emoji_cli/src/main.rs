mod filemanager;
mod presets;
mod render;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use lib_gif::constants::{EXPORT_BYTES_PER_LINE, PATCH_BYTES_PER_LINE};
use lib_gif::container::decoder::DecodeError;
use lib_gif::container::encoder::EncodeError;
use lib_gif::declaration::{self, DeclarationError};
use lib_gif::overlay::{Effect, FlameParams, TearParams};
use lib_gif::remap::Pipeline;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Container decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("Container encode failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("Declaration error: {0}")]
    Declaration(#[from] DeclarationError),
    #[error(transparent)]
    Preset(#[from] presets::PresetError),
    #[error("Overlay rendering failed: {0}")]
    Render(#[from] render::RenderError),
}

#[derive(Parser)]
#[command(version, about = "Utilities for the robot's embedded emoji GIF assets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remap the global color table of an embedded GIF in place.
    #[command(group(ArgGroup::new("rule_source").required(true).args(["preset", "rules"])))]
    Recolor {
        /// Generated source file holding the `_map[]` declaration.
        file: PathBuf,
        /// Built-in rule table: eye-yellow, sad-blue or anger-red.
        #[arg(long)]
        preset: Option<String>,
        /// Custom rule table (TOML).
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Paint a procedural effect over every frame and re-encode.
    Overlay {
        /// Generated source file holding the `_map[]` declaration.
        file: PathBuf,
        #[arg(long, value_enum)]
        effect: EffectKind,
    },
    /// Convert a GIF into a fresh embedded source file.
    Export {
        gif: PathBuf,
        /// Output path; defaults to the GIF name with a .c extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Dump the embedded byte payload back to a binary GIF.
    Extract {
        file: PathBuf,
        /// Output path; defaults to the source name with a .gif extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report the structure of an embedded or binary GIF.
    Info { file: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EffectKind {
    Flame,
    Tears,
}

impl EffectKind {
    fn effect(self) -> Effect {
        match self {
            EffectKind::Flame => Effect::Flame(FlameParams::default()),
            EffectKind::Tears => Effect::Tears(TearParams::default()),
        }
    }
}

fn main() {
    lib_gif::init_logging();
    let cli = Cli::parse();

    if let Err(err) = run(cli.command) {
        error!("Operation aborted: {}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Recolor {
            file,
            preset,
            rules,
        } => {
            let pipeline = match (preset, rules) {
                (Some(name), _) => presets::by_name(&name)?,
                (None, Some(path)) => presets::load_rules(&path)?,
                (None, None) => unreachable!("clap enforces the rule source group"),
            };
            recolor(&file, &pipeline)
        }
        Command::Overlay { file, effect } => overlay(&file, &effect.effect()),
        Command::Export { gif, output } => {
            let output = output.unwrap_or_else(|| gif.with_extension("c"));
            export(&gif, &output)
        }
        Command::Extract { file, output } => {
            let output = output.unwrap_or_else(|| file.with_extension("gif"));
            extract(&file, &output)
        }
        Command::Info { file } => info_report(&file),
    }
}

/// Single pass: parse, remap the color table, serialize, patch the
/// declaration. Any failure aborts before the target file is touched.
fn recolor(path: &Path, pipeline: &Pipeline) -> Result<(), AppError> {
    let source = fs::read_to_string(path)?;
    let span = declaration::find_array_span(&source)?;
    let payload = declaration::extract_bytes(&source, &span);
    info!("Extracted {} bytes from {}", payload.len(), path.display());

    let mut gif = lib_gif::decode(&payload)?;
    let changed = pipeline.apply(&mut gif.palette);
    println!("Remapped {} color table entries", changed);

    let encoded = lib_gif::encode(&gif)?;
    let patched = declaration::replace_array(&source, &span, &encoded, PATCH_BYTES_PER_LINE);
    write_patched(path, &patched)
}

fn overlay(path: &Path, effect: &Effect) -> Result<(), AppError> {
    let source = fs::read_to_string(path)?;
    let span = declaration::find_array_span(&source)?;
    let payload = declaration::extract_bytes(&source, &span);

    // Validate the container before handing it to the frame decoder.
    let gif = lib_gif::decode(&payload)?;
    println!(
        "Shading {} frame(s) at {}x{}",
        gif.frame_count(),
        gif.width,
        gif.height
    );

    let rendered = render::overlay_gif(&payload, effect)?;
    let patched = declaration::replace_array(&source, &span, &rendered, PATCH_BYTES_PER_LINE);
    let patched = declaration::update_field(&patched, ".data_size", rendered.len());
    write_patched(path, &patched)
}

fn write_patched(path: &Path, content: &str) -> Result<(), AppError> {
    let backup = filemanager::backup_path(path);
    let backup_exists = backup.exists();
    filemanager::write_with_backup(path, &backup, content, backup_exists)?;
    println!("Updated {} (original kept at {})", path.display(), backup.display());
    Ok(())
}

fn export(gif_path: &Path, output: &Path) -> Result<(), AppError> {
    let payload = fs::read(gif_path)?;
    let gif = lib_gif::decode(&payload)?;

    let stem = gif_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let var_name: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();

    let content = export_source(&var_name, gif.width, gif.height, &payload);
    fs::write(output, content)?;
    println!(
        "Exported {}: {} bytes, {}x{}, {} frame(s) -> {}",
        gif_path.display(),
        payload.len(),
        gif.width,
        gif.height,
        gif.frame_count(),
        output.display()
    );
    Ok(())
}

/// Generated source layout for a firmware-embedded image asset.
fn export_source(var_name: &str, width: u16, height: u16, payload: &[u8]) -> String {
    let upper = var_name.to_uppercase();
    let body = declaration::render_array(payload, EXPORT_BYTES_PER_LINE);
    format!(
        r#"#ifdef __has_include
    #if __has_include("lvgl.h")
        #ifndef LV_LVGL_H_INCLUDE_SIMPLE
            #define LV_LVGL_H_INCLUDE_SIMPLE
        #endif
    #endif
#endif

#if defined(LV_LVGL_H_INCLUDE_SIMPLE)
    #include "lvgl.h"
#else
    #include "lvgl/lvgl.h"
#endif

#ifndef LV_ATTRIBUTE_MEM_ALIGN
#define LV_ATTRIBUTE_MEM_ALIGN
#endif

#ifndef LV_ATTRIBUTE_IMG_{upper}
#define LV_ATTRIBUTE_IMG_{upper}
#endif

const LV_ATTRIBUTE_MEM_ALIGN LV_ATTRIBUTE_LARGE_CONST LV_ATTRIBUTE_IMG_{upper} uint8_t {var_name}_map[] = {{
{body}}};

const lv_img_dsc_t {var_name} = {{
  .header.cf = LV_COLOR_FORMAT_RAW,
  .header.w = {width},
  .header.h = {height},
  .data_size = {size},
  .data = {var_name}_map,
}};
"#,
        upper = upper,
        var_name = var_name,
        body = body,
        width = width,
        height = height,
        size = payload.len(),
    )
}

fn extract(path: &Path, output: &Path) -> Result<(), AppError> {
    let source = fs::read_to_string(path)?;
    let span = declaration::find_array_span(&source)?;
    let payload = declaration::extract_bytes(&source, &span);
    fs::write(output, &payload)?;
    println!(
        "Extracted {} bytes -> {}",
        payload.len(),
        output.display()
    );
    Ok(())
}

fn info_report(path: &Path) -> Result<(), AppError> {
    let payload = if path.extension().is_some_and(|e| e == "gif") {
        fs::read(path)?
    } else {
        let source = fs::read_to_string(path)?;
        let span = declaration::find_array_span(&source)?;
        declaration::extract_bytes(&source, &span)
    };

    let gif = lib_gif::decode(&payload)?;
    println!("{}", path.display());
    println!("  version:     {:?}", gif.version);
    println!("  size:        {}x{}", gif.width, gif.height);
    println!("  color table: {} entries", gif.palette.len());
    println!("  frames:      {}", gif.frame_count());
    println!("  bytes:       {}", payload.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_layout_matches_the_declaration_contract() {
        let content = export_source("sad", 4, 4, &[0xDE, 0xAD, 0xBE]);
        assert!(content.contains("uint8_t sad_map[] = {\n    0xde, 0xad, 0xbe};"));
        assert!(content.contains("LV_ATTRIBUTE_IMG_SAD"));
        assert!(content.contains(".header.w = 4,"));
        assert!(content.contains(".data_size = 3,"));

        // The exporter's own output must round-trip through the
        // declaration codec.
        let span = declaration::find_array_span(&content).unwrap();
        let bytes = declaration::extract_bytes(&content, &span);
        assert_eq!(bytes, vec![0xDE, 0xAD, 0xBE]);
    }
}
