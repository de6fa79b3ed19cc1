use mekanet::{Agent, Assembler, ModCondition, ModKind, PolicyConfig, Statement};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let policies = match config.policy {
        Some(name) => match PolicyConfig::global(&name) {
            Ok(policies) => policies,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(2);
            }
        },
        None => PolicyConfig::Default,
    };

    let mut pa = Assembler::new(demo_statements());
    match pa.make_model_with(&policies) {
        Ok(model) => print_model(model),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// A small MAPK-cascade statement set exercising most generator families.
fn demo_statements() -> Vec<Statement> {
    vec![
        Statement::complex(vec![Agent::new("EGF"), Agent::new("EGFR")]),
        Statement::active_form(
            Agent::new("BRAF").modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("365"))),
            "kinase",
            true,
        ),
        Statement::phosphorylation(
            Some(Agent::new("BRAF").with_activity("kinase", true)),
            Agent::new("MAP2K1"),
            Some("serine"),
            Some("222"),
        ),
        Statement::phosphorylation(Some(Agent::new("MAP2K1")), Agent::new("MAPK1"), Some("threonine"), Some("185")),
        Statement::dephosphorylation(Some(Agent::new("DUSP6")), Agent::new("MAPK1"), Some("threonine"), Some("185")),
        Statement::translocation(Agent::new("MAPK1"), Some("cytoplasm"), Some("nucleus")),
        Statement::decrease_amount(None, Agent::new("DUSP6")),
    ]
}

fn print_model(model: &mekanet::Model) {
    println!("monomers ({}):", model.monomers.len());
    for m in &model.monomers {
        let sites: Vec<String> = m
            .sites
            .iter()
            .map(|s| match m.states_for(s) {
                Some(states) => format!("{s}={{{}}}", states.join(",")),
                None => s.clone(),
            })
            .collect();
        println!("  {}({})", m.name, sites.join(", "));
    }
    println!("rules ({}):", model.rules.len());
    for r in &model.rules {
        println!("  {}", r.name);
    }
    println!("parameters ({}):", model.parameters.len());
    for p in &model.parameters {
        println!("  {} = {}", p.name, p.value);
    }
    if !model.expressions.is_empty() {
        println!("expressions ({}):", model.expressions.len());
        for e in &model.expressions {
            println!("  {} = {}", e.name, e.formula);
        }
    }
    println!("annotations: {}", model.annotations.len());
}

struct CliConfig {
    policy: Option<String>,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut policy = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("mekanet {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--policy" | "-p" => {
                let value = args.next().ok_or_else(|| "error: --policy expects a value".to_string())?;
                policy = Some(value);
            }
            _ if arg.starts_with("--policy=") => {
                policy = Some(arg.trim_start_matches("--policy=").to_string());
            }
            _ => {
                return Err(format!("error: unknown option '{arg}'"));
            }
        }
    }

    Ok(CliConfig { policy })
}

fn print_help() {
    println!(
        "mekanet {version}

Rule-based reaction-network assembly demo.

Usage:
  mekanet [OPTIONS]

Options:
  -p, --policy <name>        Global generation policy (one_step, two_step,
                             interactions_only, multi_way, atp_dependent,
                             michaelis_menten, hill). Default: one_step.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Assembly error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
    );
}
