use anyhow::Result;

const USAGE: &str = "\
cardtable — an interactive playing-card surface for the terminal

USAGE:
    cardtable [--seed N] [--config PATH] [--spread MODE] [--row RANK]

OPTIONS:
    --seed N        Seed the table's RNG (a fixed seed replays a session)
    --config PATH   JSON overlay for the table tunables
    --spread MODE   Deal an opening spread: random, standard, si_stebbins,
                    eight_kings, mirror_color, mirror_number, mirror_both
    --row RANK      Spawn an opening row of one rank: A, 2..10, J, Q, K, joker
    -h, --help      Show this message

Press ? inside the surface for the key bindings.";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{USAGE}");
        return Ok(());
    }
    cardtable_cui::run_with_args(&args)
}
