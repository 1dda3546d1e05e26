use clap::Parser;
use color_eyre::eyre::ensure;

use policy_tree::family::{Family, Hole};
use policy_tree::game::StochasticGameSolver;
use policy_tree::property::{Comparison, Property};
use policy_tree::quotient::{MdpFamilyQuotient, Quotient, QuotientBuilder};
use policy_tree::synthesizer::{Strategy, SynthesizerConfig, SynthesizerPolicyTree};

/// Policy trees for a family of grid mazes.
///
/// A robot walks from the top-left to the bottom-right corner of a grid. Some
/// cells may hide a pit (one hole per such cell); stepping onto a pit destroys
/// the robot with probability `danger`.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Width of the grid.
    #[arg(long, value_name = "INT", default_value = "4")]
    width: usize,

    /// Height of the grid.
    #[arg(long, value_name = "INT", default_value = "3")]
    height: usize,

    /// Number of cells that may hide a pit.
    #[arg(long, value_name = "INT", default_value = "3")]
    traps: usize,

    /// Probability of falling into a pit when stepping onto it.
    #[arg(long, value_name = "FLOAT", default_value = "0.5")]
    danger: f64,

    /// Required probability of reaching the goal.
    #[arg(long, value_name = "FLOAT", default_value = "0.9")]
    threshold: f64,

    /// Use the randomized abstraction instead of the game abstraction.
    #[arg(long)]
    randomized: bool,

    /// Do not merge siblings after the search.
    #[arg(long)]
    no_postprocess: bool,

    /// Write the policy tree in DOT format to this file.
    #[arg(long, value_name = "FILE")]
    dot: Option<std::path::PathBuf>,
}

const MOVES: [(&str, isize, isize); 4] = [("north", 0, -1), ("south", 0, 1), ("west", -1, 0), ("east", 1, 0)];

fn build_maze(args: &Cli) -> color_eyre::Result<MdpFamilyQuotient> {
    let (w, h) = (args.width, args.height);
    let cell = |x: usize, y: usize| y * w + x;
    let goal = cell(w - 1, h - 1);

    // Pit candidates: every cell on a `(x + y) % 3 == 1` diagonal except start and goal.
    let candidates: Vec<usize> = (0..w * h)
        .filter(|&c| c != 0 && c != goal && (c % w + c / w) % 3 == 1)
        .take(args.traps)
        .collect();
    let holes: Vec<Hole> = candidates
        .iter()
        .map(|&c| {
            Hole::with_labels(
                format!("pit({},{})", c % w, c / w),
                vec!["free".to_string(), "pit".to_string()],
            )
        })
        .collect();

    let mut builder = QuotientBuilder::new(holes);
    for _ in 0..w * h {
        builder.add_state();
    }
    let crash = builder.add_state();

    for y in 0..h {
        for x in 0..w {
            let from = cell(x, y);
            if from == goal {
                builder.add_choice(from, "stay", &[], vec![(from, 1.0)]);
                continue;
            }
            for (name, dx, dy) in MOVES {
                let (Some(tx), Some(ty)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                    continue;
                };
                if tx >= w || ty >= h {
                    continue;
                }
                let to = cell(tx, ty);
                match candidates.iter().position(|&c| c == to) {
                    Some(hole) => {
                        builder.add_choice(from, name, &[(hole, 0)], vec![(to, 1.0)]);
                        let fall: Vec<(usize, f64)> = vec![(crash, args.danger), (to, 1.0 - args.danger)]
                            .into_iter()
                            .filter(|&(_, p)| p > 0.0)
                            .collect();
                        builder.add_choice(from, name, &[(hole, 1)], fall);
                    }
                    None => builder.add_choice(from, name, &[], vec![(to, 1.0)]),
                }
            }
        }
    }
    builder.add_choice(crash, "stay", &[], vec![(crash, 1.0)]);
    builder.add_label("goal", goal);
    builder.add_label("crash", crash);

    Ok(builder.build()?)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);
    ensure!(args.width * args.height >= 2, "the maze needs at least two cells");
    ensure!((0.0..=1.0).contains(&args.danger), "danger must be a probability");

    let quotient = build_maze(&args)?;
    let family = Family::from_holes(quotient.holes());
    println!(
        "Maze {}x{} with {} states, {} choices and {} members",
        args.width,
        args.height,
        quotient.num_states(),
        quotient.mdp().num_choices(),
        family.size()
    );

    let property = Property::new("goal", Comparison::Ge, args.threshold)?;
    let config = SynthesizerConfig {
        strategy: if args.randomized {
            Strategy::RandomizedAbstraction
        } else {
            Strategy::GameAbstraction
        },
        postprocess: !args.no_postprocess,
        ..SynthesizerConfig::default()
    };
    let solver = StochasticGameSolver::new(&quotient, &property)?;
    let mut synthesizer = SynthesizerPolicyTree::with_config(&quotient, solver, config);
    let tree = synthesizer.synthesize(&family, &property)?;

    println!("{}", tree.summary());
    for id in tree.leaves() {
        let node = tree.node(id);
        match node.policy() {
            Some(policy) => {
                let start = policy.get(0).map_or("-", |a| quotient.action_label(a));
                println!("{} -> start with {}", node.family(), start);
            }
            None => println!("{} -> no policy", node.family()),
        }
    }

    if let Some(path) = &args.dot {
        std::fs::write(path, tree.to_dot(quotient.holes())?)?;
        println!("Policy tree written to {}", path.display());
    }

    if let Some(stats) = synthesizer.statistics() {
        println!("{}", stats);
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
