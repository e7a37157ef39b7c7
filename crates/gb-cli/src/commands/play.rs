use std::path::Path;

use colored::Colorize;
use gb_agent::{
    AdapterSelector, AgentConfig, ChoiceSelector, ConsoleAdapter, DemoAdapter, ResolverSelector,
    ScriptedAdapter, Selection, Session, SessionObserver, SessionReport,
};
use gb_mechanics::{Character, Occupation};
use gb_story::{ActionOutcome, Language, Page};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Player;

/// Starting age of the played character.
const CHARACTER_AGE: u32 = 30;

/// Everything `gamebook play` was asked to do.
pub struct PlayOptions<'a> {
    /// Decision source.
    pub player: Player,
    /// Bundled story language.
    pub lang: Language,
    /// Page file overriding the bundled story.
    pub pages: Option<&'a Path>,
    /// Dice seed.
    pub seed: Option<u64>,
    /// Character name.
    pub name: &'a str,
    /// Occupation name or "none".
    pub occupation: &'a str,
    /// Picks for the scripted player.
    pub script: Option<&'a str>,
    /// Turn cap.
    pub max_turns: u32,
    /// Journal output path.
    pub journal: Option<&'a Path>,
}

pub fn run(opts: &PlayOptions<'_>) -> Result<(), String> {
    let repo = super::load_pages(opts.lang, opts.pages)?;
    let occupation = parse_occupation(opts.occupation)?;

    let config = AgentConfig::default().with_max_turns(opts.max_turns);
    let seed = opts.seed.unwrap_or_else(|| config.seed_or_random());
    let config = config.with_seed(seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let character = Character::new(opts.name, occupation, CHARACTER_AGE, &mut rng);
    let selector = build_selector(opts.player, opts.script, seed)?;

    println!(
        "  {} {} {}",
        "Gamebook".bold(),
        character.name(),
        format!("({} player, seed={seed})", selector.name()).dimmed()
    );
    println!("  {}", character.summary().dimmed());

    let mut session = Session::new(repo, character, selector, config).with_observer(ConsoleObserver);
    let report = session.run();
    print_report(&report);

    if let Some(path) = opts.journal {
        let journal = session.journal();
        let content = if path.extension().is_some_and(|e| e == "md") {
            journal.export_markdown()
        } else {
            journal.export_text()
        };
        std::fs::write(path, content)
            .map_err(|e| format!("cannot write journal {}: {e}", path.display()))?;
        println!("  Journal written to {}", path.display());
    }

    Ok(())
}

fn parse_occupation(name: &str) -> Result<Option<Occupation>, String> {
    if name.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    name.parse::<Occupation>()
        .map(Some)
        .map_err(|e| e.to_string())
}

fn parse_script(script: &str) -> Result<Vec<usize>, String> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("invalid script entry '{s}'"))
        })
        .collect()
}

fn build_selector(
    player: Player,
    script: Option<&str>,
    seed: u64,
) -> Result<Box<dyn ChoiceSelector>, String> {
    let selector: Box<dyn ChoiceSelector> = match player {
        Player::Auto => Box::new(ResolverSelector),
        Player::Demo => Box::new(AdapterSelector::new(DemoAdapter::new(seed))),
        Player::Human => Box::new(AdapterSelector::new(ConsoleAdapter::stdio())),
        Player::Scripted => {
            let script = script.ok_or("the scripted player needs --script")?;
            let picks = parse_script(script)?;
            Box::new(AdapterSelector::new(ScriptedAdapter::new(picks)))
        }
    };
    Ok(selector)
}

fn print_report(report: &SessionReport) {
    println!();
    let reason = report.termination.to_string();
    let reason = if report.termination.is_graceful() {
        reason.green()
    } else {
        reason.yellow()
    };
    println!("  {} {reason}", "Session ended:".bold());
    println!(
        "  {} turns, final page {}, seed {}",
        report.turns, report.final_page, report.seed
    );
    println!("  {}", report.character);
}

/// Prints the story to stdout as the session runs.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_page(&mut self, page: &Page, _character: &Character) {
        println!();
        println!("  {}", format!("Page {}", page.id).bold().underline());
        println!("  {}", page.text);
        for (i, choice) in page.choices.iter().enumerate() {
            println!("    {}. {}", i + 1, choice.label());
        }
    }

    fn on_selection(&mut self, selection: &Selection) {
        println!(
            "  {} {} {}",
            ">".cyan(),
            selection.choice.label(),
            format!("({})", selection.rationale).dimmed()
        );
    }

    fn on_rejection(&mut self, reason: &str, streak: u32) {
        println!("  {} {reason} {}", "Rejected:".red(), format!("[{streak}]").dimmed());
    }

    fn on_outcome(&mut self, outcome: &ActionOutcome, character: &Character) {
        if outcome.error.is_some() {
            println!("  {}", outcome.text.yellow());
        } else {
            println!("  {}", outcome.text);
        }
        println!("  {}", character.summary().dimmed());
    }
}
