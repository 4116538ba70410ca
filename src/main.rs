use anyhow::anyhow;
use clap::{App, Arg, ArgMatches};
use ember::filter::FilterKind;
use ember::imageio::{progressive_path, save_image};
use ember::loaders::load_scene;
use ember::renderer::{resolve_resolution, ProgressSink, Renderer, TraceParams};
use ember::sampler::SamplerKind;
use ember::shader::ShaderKind;
use ember::spectrum::Spectrum;
use ember::tonemap::ToneMap;
use ember::Float;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info};

struct BarSink(ProgressBar);

impl ProgressSink for BarSink {
    fn block_done(&self, _finished: usize, _total: usize) {
        self.0.inc(1);
    }
}

fn opt<T>(matches: &ArgMatches, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = matches.value_of(name).expect("option has a default value");
    raw.parse()
        .map_err(|e| anyhow!("invalid value for --{}: {}", name, e))
}

fn cli() -> App<'static, 'static> {
    App::new("ember")
        .about("offline path tracing")
        .arg(Arg::with_name("save-progressive").long("save-progressive")
            .help("save progressive images"))
        .arg(Arg::with_name("random").long("random").takes_value(true)
            .possible_values(SamplerKind::VARIANTS).default_value("stratified")
            .help("random type"))
        .arg(Arg::with_name("filter").long("filter").takes_value(true)
            .possible_values(FilterKind::VARIANTS).default_value("box")
            .help("filter type"))
        .arg(Arg::with_name("shader").long("shader").short("S").takes_value(true)
            .possible_values(ShaderKind::VARIANTS).default_value("pathtrace")
            .help("path estimator type"))
        .arg(Arg::with_name("envmap-invisible").long("envmap-invisible")
            .help("envmap invisible"))
        .arg(Arg::with_name("shadow-notransmission").long("shadow-notransmission")
            .help("shadow without transmission"))
        .arg(Arg::with_name("block-size").long("block-size").takes_value(true)
            .default_value("32").help("block size"))
        .arg(Arg::with_name("batch-size").long("batch-size").takes_value(true)
            .default_value("16").help("batch size"))
        .arg(Arg::with_name("samples").long("samples").short("s").takes_value(true)
            .default_value("256").help("image samples"))
        .arg(Arg::with_name("no-parallel").long("no-parallel")
            .help("do not run in parallel"))
        .arg(Arg::with_name("exposure").long("exposure").short("e").takes_value(true)
            .default_value("0").help("hdr image exposure"))
        .arg(Arg::with_name("gamma").long("gamma").short("g").takes_value(true)
            .default_value("2.2").help("hdr image gamma"))
        .arg(Arg::with_name("filmic").long("filmic").short("F")
            .help("hdr filmic output"))
        .arg(Arg::with_name("resolution").long("resolution").short("r").takes_value(true)
            .default_value("540").help("image resolution"))
        .arg(Arg::with_name("ambient").long("ambient").takes_value(true)
            .default_value("0").help("ambient factor"))
        .arg(Arg::with_name("camera-lights").long("camera-lights").short("c")
            .help("enable camera lights"))
        .arg(Arg::with_name("camera").long("camera").takes_value(true)
            .default_value("0").help("camera index"))
        .arg(Arg::with_name("seed").long("seed").takes_value(true)
            .default_value("0").help("sampler seed"))
        .arg(Arg::with_name("output-image").long("output-image").short("o").takes_value(true)
            .default_value("out.hdr").help("image filename"))
        .arg(Arg::with_name("scene").required(true).help("scene filename"))
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut params = TraceParams::default();
    params.rtype = opt(matches, "random")?;
    params.ftype = opt(matches, "filter")?;
    params.stype = opt(matches, "shader")?;
    params.envmap_invisible = matches.is_present("envmap-invisible");
    params.shadow_notransmission = matches.is_present("shadow-notransmission");
    params.block_size = opt(matches, "block-size")?;
    params.batch_size = opt(matches, "batch-size")?;
    params.nsamples = opt(matches, "samples")?;
    params.parallel = !matches.is_present("no-parallel");
    params.height = opt(matches, "resolution")?;
    params.camera_id = opt(matches, "camera")?;
    params.seed = opt(matches, "seed")?;
    let amb: Float = opt(matches, "ambient")?;
    params.ambient = Spectrum::uniform(amb);
    if params.block_size == 0 || params.batch_size == 0 || params.nsamples == 0 {
        return Err(anyhow!("block-size, batch-size, and samples must be positive"));
    }
    if matches.is_present("camera-lights") {
        params.stype = ShaderKind::Eyelight;
    }

    let tonemap = ToneMap {
        exposure: opt(matches, "exposure")?,
        gamma: opt(matches, "gamma")?,
        filmic: matches.is_present("filmic"),
    };
    let save_progressive = matches.is_present("save-progressive");
    let out = PathBuf::from(matches.value_of("output-image").expect("defaulted"));
    let scene_path = matches.value_of("scene").expect("scene is required");

    info!("loading scene {}", scene_path);
    let scene = load_scene(scene_path)?;
    let camera = scene
        .camera(params.camera_id)
        .ok_or_else(|| anyhow!("scene has no camera with index {}", params.camera_id))?;

    info!("initializing tracer");
    let (width, height) = resolve_resolution(camera.aspect(), params.height);
    params.width = width;
    params.height = height;
    let renderer = Renderer::new(params.clone(), &scene);
    let film = renderer.create_film();

    info!("starting renderer");
    let mut cur_sample = 0;
    while cur_sample < params.nsamples {
        if save_progressive && cur_sample > 0 {
            let path = progressive_path(&out, cur_sample);
            info!("saving image {}", path.display());
            save_image(&path, &film.snapshot(), &tonemap)?;
        }
        info!("rendering sample {}/{}", cur_sample, params.nsamples);
        // The driver owns the clamping policy: the final batch shrinks to
        // whatever is left of the sample budget, so indices never pass it.
        let batch = params.batch_size.min(params.nsamples - cur_sample);
        let bar = ProgressBar::new(renderer.block_count() as u64);
        bar.set_style(
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} blocks"),
        );
        renderer.trace_samples(&film, &scene, camera, batch, &BarSink(bar.clone()));
        bar.finish_and_clear();
        cur_sample += batch;
    }
    info!("rendering done");

    info!("saving image {}", out.display());
    save_image(&out, &film.snapshot(), &tonemap)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let matches = cli().get_matches();
    if let Err(err) = run(&matches) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
