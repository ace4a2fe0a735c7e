//! Dump a scene's structure as a Graphviz digraph.
//!
//! Usage:
//!   cargo run --bin scene_inspect -- assets/two_bone_arm.json scene.dot

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use skinanim::core::{logging, AnimationConfig};
use skinanim::inspect::write_dot;
use skinanim::scene::Scene;

struct Args {
    scene: PathBuf,
    output: PathBuf,
}

fn print_help() {
    eprintln!("Usage: scene_inspect <scene.json> <out.dot>");
    eprintln!();
    eprintln!("Writes the node hierarchy, meshes, bones and clips of a scene as DOT.");
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Err("show_help".to_string()),
            _ => positional.push(arg),
        }
    }

    match positional.as_slice() {
        [scene, output] => Ok(Args {
            scene: PathBuf::from(scene),
            output: PathBuf::from(output),
        }),
        _ => Err(format!("expected 2 arguments, got {}", positional.len())),
    }
}

fn run(args: &Args) -> skinanim::core::Result<()> {
    let scene = Scene::load(&args.scene, &AnimationConfig::default())?;
    let mut out = BufWriter::new(File::create(&args.output)?);
    write_dot(&scene, &mut out)?;
    out.flush()?;
    log::info!("Wrote {}", args.output.display());
    Ok(())
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            if e == "show_help" {
                print_help();
                return;
            }
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        if e.is_precondition() {
            eprintln!("Invalid scene data: {}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
