use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use heroslider::config::AppConfig;
use heroslider::slider::{MemorySurface, SliderHandle};
use heroslider::ui::HeroSliderUI;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config = AppConfig::load_or_create().await?;
    info!(
        "Starting hero slider with {} slides, settings: {:?}",
        config.slides.len(),
        config.slider
    );

    // The window reads the same surface the slider task writes to
    let surface = MemorySurface::new(config.slide_views());
    let slider = SliderHandle::spawn(Box::new(surface.clone()), config.slider.clone())
        .map_err(|e| eyre!("Failed to spawn hero slider: {}", e))?;

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("Hero Slider")
        .with_inner_size([config.window.width, config.window.height])
        .with_fullscreen(config.window.fullscreen);

    let transition = config.slider.transition();
    let fps = config.window.fps;

    info!("Starting UI");
    eframe::run_native(
        "Hero Slider",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(HeroSliderUI::new(cc, surface, slider, transition, fps)))
        }),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    info!("Hero slider window closed");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
