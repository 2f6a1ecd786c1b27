//! Logistic regression evaluation harness.
//!
//! Trains on a LIBSVM file and reports ranking and calibration metrics on a
//! held-out LIBSVM file (or on the training data when none is given).
//!
//! Examples:
//! - Train and evaluate:
//!   `cargo run --bin lr_eval --release -- --train a9a.txt --test a9a.t --lambda 1`
//!
//! - Write a JSON report and the model:
//!   `cargo run --bin lr_eval --release -- --train a9a.txt --out-json report.json --out-model model.json`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use sparse_lr::data::{LibsvmDataset, LibsvmOptions, load_libsvm_file};
use sparse_lr::training::{Accuracy, Auc, LogLoss, Metric};
use sparse_lr::{LinearModel, LogisticRegressionTrainer, OptimizerConfig, Verbosity};

#[derive(Debug)]
struct Args {
	train: PathBuf,
	test: Option<PathBuf>,
	dimension: Option<usize>,
	max_instances: Option<usize>,
	lambda: f64,
	fit_intercept: bool,
	max_sweeps: usize,
	tolerance: Option<f64>,
	verbose: bool,
	out_json: Option<PathBuf>,
	out_model: Option<PathBuf>,
}

fn parse_args() -> Args {
	let mut train: Option<PathBuf> = None;
	let mut test: Option<PathBuf> = None;
	let mut dimension: Option<usize> = None;
	let mut max_instances: Option<usize> = None;
	let mut lambda = 1.0f64;
	let mut fit_intercept = true;
	let mut max_sweeps = 500usize;
	let mut tolerance: Option<f64> = Some(1e-4);
	let mut verbose = false;
	let mut out_json: Option<PathBuf> = None;
	let mut out_model: Option<PathBuf> = None;

	let mut it = std::env::args().skip(1);
	while let Some(arg) = it.next() {
		match arg.as_str() {
			"--train" => train = Some(PathBuf::from(it.next().expect("--train path"))),
			"--test" => test = Some(PathBuf::from(it.next().expect("--test path"))),
			"--dimension" => dimension = Some(it.next().expect("--dimension value").parse().unwrap()),
			"--max-instances" => max_instances = Some(it.next().expect("--max-instances value").parse().unwrap()),
			"--lambda" => lambda = it.next().expect("--lambda value").parse().unwrap(),
			"--no-intercept" => fit_intercept = false,
			"--max-sweeps" => max_sweeps = it.next().expect("--max-sweeps value").parse().unwrap(),
			"--tolerance" => {
				let v = it.next().expect("--tolerance value");
				tolerance = match v.as_str() {
					"none" => None,
					_ => Some(v.parse().unwrap_or_else(|e| panic!("invalid --tolerance {v}: {e}"))),
				};
			}
			"--verbose" => verbose = true,
			"--out-json" => out_json = Some(PathBuf::from(it.next().expect("--out-json path"))),
			"--out-model" => out_model = Some(PathBuf::from(it.next().expect("--out-model path"))),
			"--help" => {
				print_help_and_exit();
			}
			other => panic!("unknown arg: {other}"),
		}
	}

	let Some(train) = train else {
		eprintln!("--train is required\n");
		print_help_and_exit();
	};

	Args {
		train,
		test,
		dimension,
		max_instances,
		lambda,
		fit_intercept,
		max_sweeps,
		tolerance,
		verbose,
		out_json,
		out_model,
	}
}

fn print_help_and_exit() -> ! {
	eprintln!(
		"lr_eval\n\n  Data:\n    --train <path> (LIBSVM: label + index:value, 1-based indices)\n    --test <path> (default: evaluate on --train)\n    --dimension <n> (default: largest index in --train)\n    --max-instances <n>\n\n  Training:\n    --lambda <l> (default 1.0)\n    --no-intercept\n    --max-sweeps <n> (default 500)\n    --tolerance <t>|none (relative squared-gradient tolerance, default 1e-4)\n\n  Output:\n    --verbose (log optimizer progress to stderr)\n    --out-json <path>\n    --out-model <path>\n"
	);
	std::process::exit(0)
}

// =============================================================================
// Stderr logging for --verbose
// =============================================================================

struct StderrLogger;

impl log::Log for StderrLogger {
	fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &log::Record<'_>) {
		if self.enabled(record.metadata()) {
			eprintln!("[{}] {}", record.level(), record.args());
		}
	}

	fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

// =============================================================================
// Report
// =============================================================================

#[derive(Debug, Serialize)]
struct EvalRunJson {
	train: String,
	test: Option<String>,
	rows_train: usize,
	rows_test: usize,
	dimension: usize,
	lambda: f64,
	fit_intercept: bool,
	state: String,
	sweeps: usize,
	train_seconds: f64,
	weight_norm: f64,
	metrics: serde_json::Value,
}

fn load(path: &Path, options: &LibsvmOptions) -> LibsvmDataset {
	load_libsvm_file(path, options).unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()))
}

fn evaluate(model: &LinearModel, data: &LibsvmDataset) -> (f64, f64, f64) {
	let scores: Vec<f64> = data.instances.iter().map(|x| model.predict_proba(x.features())).collect();
	let labels = data.labels();
	(
		Auc.compute(&scores, &labels),
		Accuracy::default().compute(&scores, &labels),
		LogLoss.compute(&scores, &labels),
	)
}

fn main() {
	let args = parse_args();

	if args.verbose {
		log::set_logger(&LOGGER).expect("logger already set");
		log::set_max_level(log::LevelFilter::Info);
	}

	let train_options = LibsvmOptions {
		dimension: args.dimension,
		max_instances: args.max_instances,
		drop_out_of_range: false,
	};
	let train = load(&args.train, &train_options);
	// Features the training file never saw have no weight; drop them.
	let test = args.test.as_ref().map(|path| {
		let options = LibsvmOptions {
			dimension: Some(train.dimension),
			max_instances: args.max_instances,
			drop_out_of_range: true,
		};
		load(path, &options)
	});
	let eval_data = test.as_ref().unwrap_or(&train);

	let trainer = LogisticRegressionTrainer::builder()
		.lambda(args.lambda)
		.fit_intercept(args.fit_intercept)
		.optimizer(
			OptimizerConfig::builder()
				.max_sweeps(args.max_sweeps)
				.relative_tolerance(args.tolerance)
				.build()
				.unwrap(),
		)
		.verbosity(if args.verbose { Verbosity::Info } else { Verbosity::Warning })
		.build()
		.unwrap();

	let start = Instant::now();
	let (model, outcome) = trainer
		.train_with_outcome(train.dimension, &train.instances)
		.unwrap_or_else(|e| panic!("training failed: {e}"));
	let train_seconds = start.elapsed().as_secs_f64();

	let (auc, acc, ll) = evaluate(&model, eval_data);

	println!("=== sparse-lr ===");
	println!(
		"rows_train={} rows_eval={} dimension={} lambda={} intercept={}",
		train.instances.len(),
		eval_data.instances.len(),
		train.dimension,
		args.lambda,
		args.fit_intercept
	);
	println!("state={:?} sweeps={} train_seconds={train_seconds:.3}", outcome.state, outcome.sweeps);
	println!("metrics: auc={auc:.6} acc={acc:.4} logloss={ll:.6}");

	if let Some(out_model) = &args.out_model {
		fs::write(out_model, model.to_json().expect("serialize model")).expect("write out-model");
		println!("wrote {}", out_model.display());
	}

	if let Some(out_json) = &args.out_json {
		let run = EvalRunJson {
			train: args.train.display().to_string(),
			test: args.test.as_ref().map(|p| p.display().to_string()),
			rows_train: train.instances.len(),
			rows_test: eval_data.instances.len(),
			dimension: train.dimension,
			lambda: args.lambda,
			fit_intercept: args.fit_intercept,
			state: format!("{:?}", outcome.state),
			sweeps: outcome.sweeps,
			train_seconds,
			weight_norm: model.weight_norm(),
			metrics: serde_json::json!({"auc": auc, "accuracy": acc, "logloss": ll}),
		};
		let content = serde_json::to_string_pretty(&run).expect("serialize json");
		fs::write(out_json, content).expect("write out-json");
		println!("wrote {}", out_json.display());
	}
}
