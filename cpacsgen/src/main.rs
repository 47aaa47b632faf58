use std::path::Path;
use std::process::ExitCode;

use cpacsgen::run_generator;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 || args.len() > 5 {
        eprintln!(
            r#"Usage:
cpacsgen configDir runtimeSrcDir outputDir [typeSystemGraphVisFile]
"#
        );
        return ExitCode::FAILURE;
    }

    let config_dir = Path::new(&args[1]);
    let runtime_src_dir = Path::new(&args[2]);
    let output_dir = Path::new(&args[3]);
    let graph_output_path = args.get(4).map(Path::new);

    match run_generator(config_dir, runtime_src_dir, output_dir, graph_output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
