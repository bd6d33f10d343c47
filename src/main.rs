//! aupcm - Linear PCM Sample Format Converter

use anyhow::{bail, Context};
use aupcm::audio::{transcode_via, AudioFile, Encoding, Mode};
use aupcm::config::{Args, Command, Config, SelftestArgs};
use aupcm::selftest::{self, SelftestOptions};
use aupcm::init_logging;
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_args_and_config(&args)?;

    if config.verbose() {
        eprintln!("{}", aupcm::get_library_info());
    }

    match &args.command {
        Command::Convert(_) => run_convert(&config),
        Command::Info(_) => run_info(&config),
        Command::Selftest(selftest) => run_selftest(selftest),
        Command::Encodings => {
            run_encodings();
            Ok(())
        }
    }
}

fn run_convert(config: &Config) -> anyhow::Result<()> {
    let mut in_info = config.input.stream_info()?;
    let mut out_info = config.output.stream_info()?;
    let via = config.via()?;

    let mut input = AudioFile::open(&config.input_path, Mode::Read, &mut in_info)
        .with_context(|| format!("Cannot open {} for reading", config.input_path.display()))?;

    // Headers describe their own stream; carry rate and channels across.
    if input.info().filetype != aupcm::FileType::Raw {
        out_info.sample_rate = input.info().sample_rate;
        out_info.channels = input.info().channels;
    }
    log::info!("Input: {}", input.describe());

    let mut output = AudioFile::open(&config.output_path, Mode::Write, &mut out_info)
        .with_context(|| format!("Cannot open {} for writing", config.output_path.display()))?;
    log::info!("Output: {}", output.describe());

    let copied = transcode_via(via, &mut input, &mut output)?;
    input.close()?;
    output.close()?;

    log::info!("Converted {} samples", copied);
    Ok(())
}

fn run_info(config: &Config) -> anyhow::Result<()> {
    let mut info = config.input.stream_info()?;
    let file = AudioFile::open(&config.input_path, Mode::Read, &mut info)
        .with_context(|| format!("Cannot open {}", config.input_path.display()))?;

    println!("{}", file.describe());
    let info = file.info();
    println!("{} samples, {} frames, {:.3} s", info.samples, info.frames, info.seconds);
    file.close()?;
    Ok(())
}

fn run_selftest(args: &SelftestArgs) -> anyhow::Result<()> {
    let options = SelftestOptions {
        sample_rate: args.sample_rate,
        frequency: args.frequency,
        seconds: args.seconds,
        dir: args.dir.clone().unwrap_or_else(std::env::temp_dir),
    };

    let reports = selftest::run(&options)?;
    for report in &reports {
        println!("{}", report);
    }

    let failed = reports.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        bail!("{} of {} encodings failed", failed, reports.len());
    }
    println!("All {} encodings passed", reports.len());
    Ok(())
}

fn run_encodings() {
    for (encoding, name) in Encoding::SUPPORTED {
        println!("{:<10} {:#010x}  {}", name, encoding, encoding);
    }
}
