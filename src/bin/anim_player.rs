//! Headless animation player.
//!
//! Binds a clip, steps a fixed-rate clock and logs what a renderer would
//! upload each frame.
//!
//! Usage:
//!   cargo run --bin anim_player -- assets/two_bone_arm.json --clip Wave --frames 60

use std::path::PathBuf;

use glam::{Mat4, Vec3};

use skinanim::animation::AnimationInstance;
use skinanim::core::{logging, AnimationClock, AnimationConfig, Error, Result, WrapPolicy};
use skinanim::render::{AnimRenderer, RenderFrame};
use skinanim::scene::Scene;

const DEFAULT_FRAMES: u32 = 60;
const DEFAULT_FPS: f32 = 30.0;
/// Clock restart point in clip ticks
const DEFAULT_WRAP_TICKS: f32 = 190.0;

enum ClipSelector {
    Name(String),
    Index(usize),
}

struct Args {
    scene: PathBuf,
    clip: ClipSelector,
    frames: u32,
    fps: f32,
    wrap_ticks: f32,
    config: Option<PathBuf>,
}

fn print_help() {
    eprintln!("Usage: anim_player <scene.json> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --clip NAME        Bind the clip with this name");
    eprintln!("  --clip-index N     Bind the clip at this index (default 0)");
    eprintln!("  --frames N         Number of frames to play (default {})", DEFAULT_FRAMES);
    eprintln!("  --fps F            Frame rate of the simulated clock (default {})", DEFAULT_FPS);
    eprintln!("  --wrap-ticks T     Restart the clock after T ticks (default {}, 0 disables)", DEFAULT_WRAP_TICKS);
    eprintln!("  --config FILE      Animation config JSON");
    eprintln!("  -h, --help         Show this help");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> std::result::Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("invalid value for {}: {}", flag, value))
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut args = std::env::args().skip(1);

    let mut scene = None;
    let mut clip = ClipSelector::Index(0);
    let mut frames = DEFAULT_FRAMES;
    let mut fps = DEFAULT_FPS;
    let mut wrap_ticks = DEFAULT_WRAP_TICKS;
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--clip" => clip = ClipSelector::Name(parse_value(&arg, args.next())?),
            "--clip-index" => clip = ClipSelector::Index(parse_value(&arg, args.next())?),
            "--frames" => frames = parse_value(&arg, args.next())?,
            "--fps" => fps = parse_value(&arg, args.next())?,
            "--wrap-ticks" => wrap_ticks = parse_value(&arg, args.next())?,
            "--config" => config = Some(parse_value::<PathBuf>(&arg, args.next())?),
            "-h" | "--help" | "help" => return Err("show_help".to_string()),
            other if other.starts_with('-') => return Err(format!("unknown option {}", other)),
            _ => scene = Some(PathBuf::from(arg)),
        }
    }

    if fps <= 0.0 {
        return Err("--fps must be positive".to_string());
    }

    Ok(Args {
        scene: scene.ok_or("missing scene file")?,
        clip,
        frames,
        fps,
        wrap_ticks,
        config,
    })
}

/// Logs each frame's mesh transforms and first bone matrix
struct LogRenderer {
    frame: u32,
}

impl AnimRenderer for LogRenderer {
    fn draw(&mut self, frame: &RenderFrame<'_>) -> Result<()> {
        for mesh in 0..frame.mesh_count() {
            let Some(uniforms) = frame.uniforms(mesh) else {
                continue;
            };
            let model = Mat4::from_cols_array_2d(&uniforms.model);
            let bone = Mat4::from_cols_array_2d(&uniforms.bones[0]);
            let name = frame.mesh_data(mesh).map_or("?", |d| d.name.as_str());
            log::info!(
                "frame {:4} mesh {} ({}): model at {:?}, bone 0 at {:?}",
                self.frame,
                mesh,
                name,
                model.transform_point3(Vec3::ZERO),
                bone.transform_point3(Vec3::ZERO)
            );
        }
        self.frame += 1;
        Ok(())
    }
}

/// Bind the selected clip. A name with no matching clip is an error listing the
/// clips the scene does have.
fn bind_clip<'a>(
    scene: &'a Scene,
    selector: &ClipSelector,
    camera: Mat4,
    config: &AnimationConfig,
) -> Result<AnimationInstance<'a>> {
    match selector {
        ClipSelector::Index(index) => AnimationInstance::new(scene, *index, camera, config),
        ClipSelector::Name(name) => match AnimationInstance::by_name(scene, name, camera, config)? {
            Some(instance) => Ok(instance),
            None => {
                let available: Vec<&str> = scene.clips().iter().map(|c| c.name.as_str()).collect();
                Err(Error::Import(format!(
                    "scene has no clip named '{}' (available: {})",
                    name,
                    available.join(", ")
                )))
            }
        },
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => AnimationConfig::load(path)?,
        None => AnimationConfig::default(),
    };
    let scene = Scene::load(&args.scene, &config)?;
    let camera = Mat4::look_at_rh(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y);

    let mut instance = bind_clip(&scene, &args.clip, camera, &config)?;

    log::info!(
        "Playing '{}' for {} frames at {} fps",
        instance.clip().name,
        args.frames,
        args.fps
    );

    let mut clock = if args.wrap_ticks > 0.0 {
        AnimationClock::with_wrap(WrapPolicy::new(instance.ticks_per_second(), args.wrap_ticks))
    } else {
        AnimationClock::new()
    };
    let mut renderer = LogRenderer { frame: 0 };
    let dt = 1.0 / args.fps;

    for _ in 0..args.frames {
        let seconds = clock.advance_by(dt);
        instance.render(seconds, &mut renderer)?;
    }

    log::info!(
        "Done: {} frames, clock wrapped {} times",
        clock.frame_count(),
        clock.wrap_count()
    );
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

    if let Err(e) = run(args) {
        if e.is_precondition() {
            eprintln!("Invalid scene data: {}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
