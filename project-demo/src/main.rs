use std::{error::Error, path::PathBuf, thread};

use clap::Parser;
use log::info;
use vm_sim::{
    config::SimConfig,
    page_replacer::ReplacementPolicy,
    player::{Mode, Player, Tick},
    Component, Step, StepReport,
};

#[derive(Parser, Debug)]
#[command(name = "vm-sim-demo")]
#[command(about = "Step through virtual to physical address translation")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Victim selection when RAM is full (random or fifo)
    #[arg(long, value_parser = parse_policy)]
    policy: Option<ReplacementPolicy>,

    /// Keep issuing random accesses until --requests have completed
    #[arg(long)]
    autoplay: bool,

    /// Number of random accesses to run
    #[arg(short = 'n', long, default_value_t = 10)]
    requests: u64,

    /// Pages to access in order, e.g. --vpn 5,5,12
    #[arg(long, value_delimiter = ',')]
    vpn: Vec<usize>,

    /// Do not wait between steps
    #[arg(long)]
    no_delay: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

fn parse_policy(s: &str) -> Result<ReplacementPolicy, String> {
    match s {
        "random" => Ok(ReplacementPolicy::Random),
        "fifo" => Ok(ReplacementPolicy::Fifo),
        other => Err(format!("unknown policy `{}`, expected random or fifo", other)),
    }
}

fn tag(component: Option<Component>) -> &'static str {
    component.map_or("-", Component::tag)
}

fn print_step(report: &StepReport, tick: u64) {
    println!("[{:>4}] {:<4} {}", tick, tag(report.component), report.label);
}

/// Ticks until the player goes idle, stopping auto-play after `limit` accesses.
fn drive(player: &mut Player, limit: u64, delay: bool) -> Result<(), Box<dyn Error>> {
    loop {
        let report = match player.tick()? {
            Tick::Stepped(report) => report,
            Tick::Idle => return Ok(()),
        };

        print_step(&report, player.mmu().tick());

        if report.step == Step::Complete {
            if let Some(line) = player.mmu().log().latest() {
                println!("       => {}", line.message);
            }
            if player.mode() == Mode::Auto && player.mmu().stats().ram_accesses >= limit {
                info!("auto-play reached {} accesses, stopping", limit);
                player.set_mode(Mode::Manual);
            }
        }

        if delay {
            thread::sleep(player.next_delay());
        }
    }
}

fn print_summary(player: &Player) {
    let mmu = player.mmu();
    let stats = mmu.stats();

    println!();
    println!(
        "tlb hits {}  tlb misses {}  page faults {}  ram accesses {}  hit ratio {:.2}",
        stats.tlb_hits,
        stats.tlb_misses,
        stats.page_faults,
        stats.ram_accesses,
        stats.tlb_hit_ratio()
    );

    let tlb: Vec<String> = mmu
        .tlb()
        .entries()
        .map(|e| format!("{}->{}", e.vpn, e.frame))
        .collect();
    println!("tlb (lru first): [{}]", tlb.join(", "));

    for frame in mmu.ram().frames() {
        println!(
            "frame {}: {}",
            frame.index,
            frame.label.as_deref().unwrap_or("free")
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_path(path)?,
        None => SimConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    if cli.autoplay {
        config.mode = Mode::Auto;
    }

    info!("starting with {:?}", config);

    let mut player = config.build_player();
    let delay = !cli.no_delay;

    if !cli.vpn.is_empty() {
        player.set_mode(Mode::Manual);
        for vpn in &cli.vpn {
            player.request(Some(*vpn))?;
            drive(&mut player, 0, delay)?;
        }
    } else if player.mode() == Mode::Auto {
        drive(&mut player, cli.requests, delay)?;
    } else {
        for _ in 0..cli.requests {
            player.request(None)?;
            drive(&mut player, 0, delay)?;
        }
    }

    print_summary(&player);

    if cli.json {
        println!("{}", player.mmu().snapshot().to_json()?);
    }

    Ok(())
}
