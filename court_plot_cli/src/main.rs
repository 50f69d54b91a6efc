//! Command line renderer for tennis serve placement maps.

use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use court_plot::court::{CourtDimensions, CourtModel};
use court_plot::density::{estimate_density, DensityConfig};
use court_plot::geometry::Point3;
use court_plot::io::{
    ace_point_ids, bounce_points, filter_serves, read_serve_records, read_tracking_samples,
    tracking_sequence, CourtSide, ServeFilter,
};
use court_plot::render::pixmap::PixmapCanvas;
use court_plot::render::Canvas3;
use court_plot::scene::{
    draw_bounce_arc, draw_court, draw_density_overlay, draw_floor_markers, draw_label,
    draw_marker_key, CourtStyle,
};
use court_plot::styles::{ColorRamp, LineStyle, MarkerStyle, Rgba, RAMP_SIZE};
use court_plot::text::{Axis, GlyphFont, TextPlacement};
use court_plot::trajectory::{BounceArc, DEFAULT_BOUNCE_INDEX, DEFAULT_SAMPLES};

#[derive(Parser)]
#[command(name = "court_plot_cli", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a serve placement map with density contours and ace trajectories
    ServeMap(ServeMapArgs),
    /// Render an empty regulation court
    Court(CourtArgs),
}

#[derive(Args)]
struct ServeMapArgs {
    /// Play-by-play CSV table
    #[arg(long)]
    pbp: String,
    /// Ball tracking CSV table
    #[arg(long)]
    tracking: String,
    /// Server to select from the play-by-play table
    #[arg(long)]
    server_id: u64,
    /// Serve number to keep
    #[arg(long, default_value_t = 1)]
    serve_num: u32,
    /// TrueType font used for the floor labels
    #[arg(long)]
    font: String,
    /// Output PNG path
    #[arg(long, default_value = "serve_map.png")]
    out: String,
    /// Image width in pixels
    #[arg(long, default_value_t = 1600)]
    width: u32,
    /// Image height in pixels
    #[arg(long, default_value_t = 1200)]
    height: u32,
    /// Title drawn along the sideline
    #[arg(long, default_value = "1st Serve Locations")]
    title: String,
    /// Court floor colour, named or #rrggbb
    #[arg(long, default_value = "#9a2f09")]
    court_color: String,
    /// Density colour for the deuce service court
    #[arg(long, default_value = "teal")]
    deuce_color: String,
    /// Density colour for the ad service court
    #[arg(long, default_value = "orange")]
    ad_color: String,
    /// Colour for ace trajectories and the marker key
    #[arg(long, default_value = "pink")]
    ace_color: String,
    /// Number of density contour levels per service court
    #[arg(long, default_value_t = 10)]
    levels: usize,
}

#[derive(Args)]
struct CourtArgs {
    /// Output PNG path
    #[arg(long, default_value = "court.png")]
    out: String,
    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,
    /// Image height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// Court floor colour, named or #rrggbb
    #[arg(long, default_value = "cornflowerblue")]
    court_color: String,
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::ServeMap(args) => render_serve_map(args),
        Commands::Court(args) => render_court(args),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn render_serve_map(args: ServeMapArgs) -> court_plot::Result<()> {
    let records = read_serve_records(&args.pbp)?;
    let samples = read_tracking_samples(&args.tracking)?;
    info!(
        "loaded {} serves and {} tracking samples",
        records.len(),
        samples.len()
    );

    let mut filter = ServeFilter::first_serves(args.server_id);
    filter.serve_num = args.serve_num;
    let kept = filter_serves(&records, &filter);
    info!(
        "{} serves match server {} serve number {}",
        kept.len(),
        args.server_id,
        args.serve_num
    );

    let floor = Rgba::from_str(&args.court_color)?;
    let deuce = Rgba::from_str(&args.deuce_color)?;
    let ad = Rgba::from_str(&args.ad_color)?;
    let ace = Rgba::from_str(&args.ace_color)?;
    let font = GlyphFont::load(&args.font)?;

    let model = CourtModel::build(&CourtDimensions::default());
    let mut canvas = PixmapCanvas::new(args.width, args.height, Rgba::WHITE)?;
    canvas.set_view(20.0, 10.0);
    draw_court(&mut canvas, &model, &CourtStyle::default().with_floor(floor));

    let title_color = Rgba::new(0.0, 0.0, 0.0, 0.6);
    draw_label(
        &mut canvas,
        &font,
        &args.title,
        &TextPlacement::new(Point3::new(8.0, -4.0, 0.0), Axis::Z, 0.65)
            .with_angle(FRAC_PI_2)
            .with_colors(title_color, title_color),
    );
    let ad_text = Rgba::new(0.886, 0.454, 0.070, 0.5);
    draw_label(
        &mut canvas,
        &font,
        "Ad Court",
        &TextPlacement::new(Point3::new(3.0, -3.2, 0.0), Axis::Z, 0.6)
            .with_angle(FRAC_PI_2)
            .with_colors(ad_text, ad_text),
    );
    let deuce_text = Rgba::new(0.203, 0.435, 0.325, 0.5);
    draw_label(
        &mut canvas,
        &font,
        "Deuce Court",
        &TextPlacement::new(Point3::new(3.0, 0.42, 0.0), Axis::Z, 0.6)
            .with_angle(FRAC_PI_2)
            .with_colors(deuce_text, deuce_text),
    );
    draw_label(
        &mut canvas,
        &font,
        "Aces",
        &TextPlacement::new(Point3::new(14.0, 5.0, 0.0), Axis::Z, 0.45).with_angle(FRAC_PI_2),
    );

    let overlays: Vec<_> = [(CourtSide::Deuce, deuce), (CourtSide::Ad, ad)]
        .into_iter()
        .map(|(side, high)| (side, high, bounce_points(&kept, side)))
        .collect();

    for (side, high, points) in &overlays {
        match estimate_density(points, &DensityConfig::default()) {
            Ok(grid) => {
                let ramp = ColorRamp::alpha_ramp(floor, *high, RAMP_SIZE);
                draw_density_overlay(&mut canvas, &grid, args.levels, &ramp, 1.5);
            }
            Err(e) => warn!("skipping density overlay for {side:?}: {e}"),
        }
    }
    for (_, high, points) in &overlays {
        let style = LineStyle::markers(
            high.with_alpha(0.5),
            MarkerStyle::new(4.0).with_edge(Rgba::BLACK),
        );
        draw_floor_markers(&mut canvas, points, &style);
    }

    let arc_style = LineStyle::markers(ace.with_alpha(0.5), MarkerStyle::new(3.0).with_every(2));
    for id in ace_point_ids(&kept) {
        let flight = tracking_sequence(&samples, id);
        match BounceArc::fit(&flight, DEFAULT_BOUNCE_INDEX, DEFAULT_SAMPLES) {
            Ok(arc) => draw_bounce_arc(&mut canvas, &arc, &arc_style),
            Err(e) => warn!("skipping ace trajectory for point {id}: {e}"),
        }
    }
    let key_style = LineStyle::markers(ace.with_alpha(0.5), MarkerStyle::new(3.0));
    draw_marker_key(&mut canvas, 13.3, (4.75, 6.25), 7, &key_style);

    canvas.save_png(&args.out)?;
    println!("Wrote {}", args.out);
    Ok(())
}

fn render_court(args: CourtArgs) -> court_plot::Result<()> {
    let floor = Rgba::from_str(&args.court_color)?;
    let model = CourtModel::build(&CourtDimensions::default());
    let mut canvas = PixmapCanvas::new(args.width, args.height, Rgba::WHITE)?;
    canvas.set_view(20.0, 10.0);
    draw_court(&mut canvas, &model, &CourtStyle::default().with_floor(floor));
    canvas.save_png(&args.out)?;
    println!("Wrote {}", args.out);
    Ok(())
}
