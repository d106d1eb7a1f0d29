use clap::{App, Arg, ArgMatches};
use num::Complex;
use std::io;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use juliaset::{ImageExporter, RenderConfig, RenderError, TerminalPresenter};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const PARAMETER: &str = "parameter";
const GRID: &str = "grid";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const PREVIEW: &str = "preview";
const PREVIEW_SIZE: &str = "preview-size";
const PREVIEW_GRID: &str = "preview-grid";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("julia")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Multisampled Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("julia.png")
                .help("Output file; the extension picks the format"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1920x1080")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1.6,-0.9")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the viewport"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.6,0.9")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the viewport"),
        )
        .arg(
            Arg::with_name(PARAMETER)
                .long(PARAMETER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.8,0.156")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse the Julia parameter"))
                .help("The constant c in z*z + c"),
        )
        .arg(
            Arg::with_name(GRID)
                .long(GRID)
                .short("g")
                .takes_value(true)
                .default_value("4")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        16,
                        "Could not parse sample grid width",
                        "Sample grid width must be between 1 and 16",
                    )
                })
                .help("Samples per axis per pixel of the output image"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver [default: all cores]"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("500")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 100000",
                    )
                })
                .help("Iterations before a point is taken to be inside the set"),
        )
        .arg(
            Arg::with_name(PREVIEW)
                .long(PREVIEW)
                .short("p")
                .help("Draw one live frame on the terminal instead of writing a file"),
        )
        .arg(
            Arg::with_name(PREVIEW_SIZE)
                .long(PREVIEW_SIZE)
                .takes_value(true)
                .default_value("80x48")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse preview size"))
                .help("Size of the terminal preview, in pixels (two rows per line)"),
        )
        .arg(
            Arg::with_name(PREVIEW_GRID)
                .long(PREVIEW_GRID)
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        16,
                        "Could not parse preview grid width",
                        "Preview grid width must be between 1 and 16",
                    )
                })
                .help("Samples per axis per pixel of the preview"),
        )
        .get_matches()
}

// Every value has a default and has passed its validator by now, so a
// failure here is a bug in `args`.
fn pair(matches: &ArgMatches, name: &str) -> (usize, usize) {
    let (w, h): (u16, u16) = matches
        .value_of(name)
        .and_then(|s| parse_pair(s, 'x'))
        .expect("size was validated");
    (usize::from(w), usize::from(h))
}

fn complex(matches: &ArgMatches, name: &str) -> Complex<f64> {
    matches
        .value_of(name)
        .and_then(parse_complex)
        .expect("complex number was validated")
}

fn number(matches: &ArgMatches, name: &str) -> usize {
    matches
        .value_of(name)
        .and_then(|s| usize::from_str(s).ok())
        .expect("number was validated")
}

fn config(matches: &ArgMatches) -> RenderConfig {
    RenderConfig {
        leftlower: complex(matches, LEFTLOWER),
        rightupper: complex(matches, RIGHTUPPER),
        parameter: complex(matches, PARAMETER),
        live_size: pair(matches, PREVIEW_SIZE),
        live_grid: number(matches, PREVIEW_GRID),
        export_size: pair(matches, SIZE),
        export_grid: number(matches, GRID),
        output: PathBuf::from(matches.value_of(OUTPUT).unwrap_or("julia.png")),
        max_iterations: number(matches, ITERATIONS),
        threads: matches
            .value_of(THREADS)
            .and_then(|s| usize::from_str(s).ok())
            .unwrap_or_else(num_cpus::get),
    }
}

fn run(config: &RenderConfig, preview: bool) -> Result<(), RenderError> {
    let context = config.context()?;
    let renderer = config.renderer();
    if preview {
        let mut session = config.live_session()?;
        let stdout = io::stdout();
        let mut sink = TerminalPresenter::new(stdout.lock());
        renderer.render_live(&context, &mut session, &mut sink)
    } else {
        let grid = config.export_grid()?;
        let (width, height) = config.export_size;
        renderer.render_export(&context, &grid, width, height, &config.output, &mut ImageExporter)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    let config = config(&matches);

    if let Err(e) = run(&config, matches.is_present(PREVIEW)) {
        eprintln!("Render failure: {}", e);
        process::exit(1);
    }
}
