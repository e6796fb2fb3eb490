// MNIST handwritten digit classification with the tensile engine.
//
// Architecture:
//   Input(784) → Linear(784, hidden) → ReLU → Linear(hidden, 10) → Softmax
//
// Every training step opens no new allocations beyond its own working set:
// the batch, predictions, and gradients are enrolled in a TensorPool and
// drained at the end of the step. Model parameters are never enrolled.
//
// Usage:
//   cargo run -p mnist-demo                              # synthetic data (quick demo)
//   cargo run -p mnist-demo -- --data-dir path/to/mnist  # real MNIST IDX files
//   cargo run -p mnist-demo -- --steps 2000 --lr 0.05

use rand::rngs::StdRng;
use rand::SeedableRng;

use tensile_core::TensorPool;
use tensile_data::{MnistDataset, MnistSplit};
use tensile_nn::{accuracy, Mlp};

struct Config {
    data_dir: Option<String>,
    steps: usize,
    batch_size: usize,
    hidden: usize,
    lr: f32,
    seed: u64,
    log_every: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            steps: 1000,
            batch_size: 64,
            hidden: 128,
            lr: 0.05,
            seed: 0,
            log_every: 100,
        }
    }
}

fn parse_args() -> Config {
    let mut cfg = Config::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data-dir" => {
                i += 1;
                cfg.data_dir = Some(args[i].clone());
            }
            "--steps" => {
                i += 1;
                cfg.steps = args[i].parse().expect("invalid --steps");
            }
            "--batch-size" => {
                i += 1;
                cfg.batch_size = args[i].parse().expect("invalid --batch-size");
            }
            "--hidden" => {
                i += 1;
                cfg.hidden = args[i].parse().expect("invalid --hidden");
            }
            "--lr" => {
                i += 1;
                cfg.lr = args[i].parse().expect("invalid --lr");
            }
            "--seed" => {
                i += 1;
                cfg.seed = args[i].parse().expect("invalid --seed");
            }
            "--help" | "-h" => {
                println!("MNIST training demo for tensile");
                println!();
                println!("Options:");
                println!("  --data-dir <path>   Path to decompressed MNIST IDX files");
                println!("  --steps <n>         Number of SGD steps (default: 1000)");
                println!("  --batch-size <n>    Batch size (default: 64)");
                println!("  --hidden <n>        Hidden layer width (default: 128)");
                println!("  --lr <f>            Learning rate (default: 0.05)");
                println!("  --seed <n>          RNG seed (default: 0)");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    cfg
}

fn load_split(cfg: &Config, split: MnistSplit) -> Result<MnistDataset, tensile_data::MnistError> {
    match &cfg.data_dir {
        Some(dir) => MnistDataset::load(dir, split),
        None => {
            let n = match split {
                MnistSplit::Train => 2000,
                MnistSplit::Test => 500,
            };
            Ok(MnistDataset::synthetic(n, split))
        }
    }
}

fn run(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let train = load_split(cfg, MnistSplit::Train)?;
    let test = load_split(cfg, MnistSplit::Test)?;
    let (rows, cols) = train.image_dims();
    let n_inputs = rows * cols;

    println!(
        "train: {} samples, test: {} samples, {}x{} pixels{}",
        train.num_samples(),
        test.num_samples(),
        rows,
        cols,
        if cfg.data_dir.is_none() {
            " (synthetic)"
        } else {
            ""
        },
    );

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut model = Mlp::new_with(&mut rng, n_inputs, cfg.hidden, 10);
    let mut arena = TensorPool::with_capacity(16);

    for step in 1..=cfg.steps {
        let batch = train.batch(&mut rng, cfg.batch_size, true);
        let x = arena.add(batch.images.mul_scalar(1.0 / 255.0));
        let y = arena.add(batch.labels);

        let pass = model.forward_backward(arena.get(x), arena.get(y))?;
        model.apply_gradients(&pass.grads, cfg.lr)?;

        if step % cfg.log_every == 0 || step == 1 {
            let predictions = arena.add(pass.probs.argmax(1)?);
            let acc = accuracy(arena.get(y), arena.get(predictions))?;
            println!(
                "step {:>5}/{}  loss {:.4}  batch acc {:.3}",
                step, cfg.steps, pass.loss, acc
            );
        }

        // End of step: release the whole working set at once.
        arena.drain();
    }

    // Evaluate on the full test split, each sample exactly once.
    let eval = test.batch_all(true);
    let x = eval.images.mul_scalar(1.0 / 255.0);
    let probs = model.forward(&x)?;
    let predictions = probs.argmax(1)?;
    let acc = accuracy(&eval.labels, &predictions)?;
    println!("test accuracy: {:.4}", acc);

    Ok(())
}

fn main() {
    let cfg = parse_args();
    if let Err(e) = run(&cfg) {
        eprintln!("[ERROR] {e}");
        std::process::exit(1);
    }
}
