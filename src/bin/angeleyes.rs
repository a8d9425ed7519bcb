/// AngelEyes 实时检测主程序
///
/// 摄像头:   cargo run --bin angeleyes --release --features camera -- --source camera:0
/// 无窗口:   cargo run --bin angeleyes -- --source frames/ --headless --max-frames 100 --save out.png
use angeleyes::input::{self, InputSource};
use angeleyes::renderer::{window_conf, WindowDisplay};
use angeleyes::session::Flow;
use angeleyes::{
    controls_banner, models, Args, ClassNames, Detector, HeadlessDisplay, Overlay, Pipeline,
    SessionState, TextPainter, UiConfig,
};
use clap::Parser;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("AngelEyes Object Detection Started!");
    log::info!("{}", controls_banner());

    let ui = UiConfig::load(&args.config);
    ui.print_summary();

    // 命令行阈值优先于配置文件
    let threshold = args.threshold.unwrap_or(ui.confidence_threshold);
    let session = SessionState::new(threshold, ui.show_stats);

    let classes = ClassNames::load(&args.classes);
    let detector = match models::load(&args.model) {
        Ok(model) => Detector::new(model, classes),
        Err(e) => {
            log::warn!("⚠️ {}", e);
            Detector::disabled(classes)
        }
    };

    let painter = TextPainter::load_or_builtin(ui.font_path.as_ref())?;
    let overlay = Overlay::new(painter).with_title(ui.window_title.clone());

    let source: InputSource = args.source.parse()?;
    list_cameras(&source);
    let frames = input::open(&source, args.width, args.height, ui.frame_timeout())?;

    let pipeline = Pipeline::new(frames, detector, overlay, session);

    if args.headless {
        run_headless(pipeline, &args)
    } else {
        run_window(pipeline, &ui, &args);
        Ok(())
    }
}

#[cfg(feature = "camera")]
fn list_cameras(source: &InputSource) {
    if let InputSource::Camera(_) = source {
        for (i, name) in input::camera::camera_devices() {
            log::info!("📷 [{}] {}", i, name);
        }
    }
}

#[cfg(not(feature = "camera"))]
fn list_cameras(_source: &InputSource) {}

fn run_headless(mut pipeline: Pipeline, args: &Args) -> anyhow::Result<()> {
    let mut display = HeadlessDisplay::new(args.max_frames);
    let result = pipeline.run(&mut display);
    // 先释放输入源
    drop(pipeline);

    if let Some(path) = &args.save {
        if !display.save(path)? {
            log::warn!("⚠️ 没有可保存的帧");
        }
    }
    log::info!("AngelEyes Object Detection Stopped!");
    Ok(result?)
}

fn run_window(mut pipeline: Pipeline, ui: &UiConfig, args: &Args) {
    let conf = window_conf(&ui.window_title, args.width, args.height);
    macroquad::Window::from_config(conf, async move {
        let mut display = WindowDisplay::new();
        loop {
            match pipeline.tick(&mut display) {
                Ok(Flow::Continue) => macroquad::prelude::next_frame().await,
                Ok(Flow::Quit) => break,
                Err(e) => {
                    log::error!("❌ {}", e);
                    break;
                }
            }
        }
        log::info!(
            "🛑 主循环结束 (共 {} 次迭代, 显示 {} 帧)",
            pipeline.iterations(),
            display.presented()
        );
        log::info!("📊 检测统计: {}", pipeline.detector().summary());
        drop(pipeline);
        log::info!("AngelEyes Object Detection Stopped!");
    });
}
