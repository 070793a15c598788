//! immediate3d demo host
//!
//! Opens a window, renders the selected scene into a software framebuffer
//! each frame and blits it to the screen.
//!
//! Usage: `immediate3d [crate|stars] [--config path]`

use std::path::PathBuf;

use log::{error, info};
use macroquad::prelude::*;

use immediate3d::scenes::{scene_by_name, Scene, SCENE_NAMES};
use immediate3d::{load_config, Framebuffer, RenderConfig, Renderer, HEIGHT, WIDTH};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

struct Args {
    scene: String,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut scene = None;
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            name if scene.is_none() && !name.starts_with('-') => scene = Some(name.to_string()),
            other => return Err(format!("Unexpected argument: {}", other)),
        }
    }

    Ok(Args {
        scene: scene.unwrap_or_else(|| "crate".to_string()),
        config,
    })
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("immediate3d v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            error!("Usage: immediate3d [{}] [--config path]", SCENE_NAMES.join("|"));
            return;
        }
    };

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => {
                info!("Loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                error!("Failed to load config {}: {}", path.display(), e);
                return;
            }
        },
        None => RenderConfig::default(),
    };

    let mut scene: Box<dyn Scene> = match scene_by_name(&args.scene) {
        Some(scene) => scene,
        None => {
            error!("Unknown scene '{}', expected one of: {}", args.scene, SCENE_NAMES.join(", "));
            return;
        }
    };
    info!("immediate3d v{}: scene '{}'", VERSION, scene.name());

    let mut renderer = Renderer::new(config);
    let start = get_time();

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let (w, h) = (screen_width() as usize, screen_height() as usize);
        let fb = renderer
            .take_screen()
            .filter(|fb| fb.width == w && fb.height == h)
            .unwrap_or_else(|| Framebuffer::new(w, h));
        if let Err(e) = renderer.set_screen(fb) {
            error!("Cannot render to window surface: {}", e);
            break;
        }

        if let Err(e) = scene.draw(&mut renderer, (get_time() - start) as f32) {
            error!("Scene '{}' failed: {}", scene.name(), e);
            break;
        }

        clear_background(BLACK);
        if let Some(fb) = renderer.screen() {
            let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.to_rgba8());
            texture.set_filter(FilterMode::Nearest);
            draw_texture_ex(
                &texture,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(w as f32, h as f32)),
                    ..Default::default()
                },
            );
        }

        let stats = renderer.stats();
        draw_text(
            &format!("FPS: {} | triangles: {}", get_fps(), stats.triangles),
            5.0,
            20.0,
            20.0,
            WHITE,
        );
        renderer.reset_stats();

        next_frame().await;
    }
}
