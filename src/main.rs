//! Quiz Runner entry point
//!
//! Native builds run a headless demo: a simple autopilot plays seeded runs
//! at a jittery ~60 Hz, answers knowledge checks and reports the results.
//!
//! Usage: `quiz-runner [seed] [runs] [chill|normal|blitz]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use quiz_runner::consts::*;
    use quiz_runner::ledger::PointsLedger;
    use quiz_runner::quiz::{AnswerOutcome, QUESTION_BANK};
    use quiz_runner::sim::{GameEvent, Session, SessionPhase, TickInput, player_hitbox};
    use quiz_runner::{HighScores, InMemoryLedger, Runner, Settings};

    /// Longest simulated run before the demo calls time
    const RUN_TIME_LIMIT_MS: f64 = 10.0 * 60.0 * 1000.0;
    /// Chance the autopilot knows the answer
    const ANSWER_ACCURACY: f64 = 0.75;

    /// Pick this frame's input from the nearest obstacle ahead
    fn autopilot(session: &Session) -> TickInput {
        let player = player_hitbox(&session.player);
        let reach = session.scroll_speed * 12.0 + player.size().x;
        let threat = session
            .obstacles
            .iter()
            .map(|o| (o, o.hitbox()))
            .filter(|(_, b)| b.max.x > player.min.x && b.min.x - player.max.x < reach)
            .min_by(|(_, a), (_, b)| a.center().x.total_cmp(&b.center().x));

        let Some((obstacle, hitbox)) = threat else {
            return TickInput::default();
        };
        let clears_duck = hitbox.max.y <= GROUND_LINE - DUCK_HEIGHT;
        let grounded = session.player.y >= GROUND_Y;

        if obstacle.kind.oscillation().is_some() && clears_duck && grounded {
            TickInput {
                duck: true,
                ..Default::default()
            }
        } else {
            TickInput {
                jump: grounded,
                ..Default::default()
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);
        let runs: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

        let mut settings = Settings::load();
        if let Some(arg) = args.next() {
            match arg.parse() {
                Ok(mode) => settings.speed_mode = mode,
                Err(e) => log::warn!("{}, keeping {}", e, settings.speed_mode.as_str()),
            }
        }
        log::info!(
            "Quiz Runner demo: seed {} runs {} mode {}",
            seed,
            runs,
            settings.speed_mode.as_str()
        );

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ledger = InMemoryLedger::new(100).with_leaderboard(HighScores::load());
        let mut runner = Runner::with_session(Session::new(seed), settings);
        let mut now = 0.0;

        for run in 1..=runs {
            if let Err(e) = runner.start(&mut ledger, now) {
                log::error!("Run {} refused: {}", run, e);
                break;
            }
            let started = now;

            while runner.phase() != SessionPhase::GameOver {
                now += TARGET_FRAME_MS + rng.random_range(-4.0..=4.0);
                if now - started > RUN_TIME_LIMIT_MS {
                    runner.expire();
                    break;
                }

                let input = autopilot(runner.session());
                for event in runner.frame(now, &input) {
                    match event {
                        GameEvent::KnowledgeCheckPresented { question } => {
                            let q = &QUESTION_BANK[question];
                            let choice = if rng.random_bool(ANSWER_ACCURACY) {
                                q.answer
                            } else {
                                (q.answer + 1) % q.choices.len()
                            };
                            let outcome = runner.answer(choice);
                            log::info!("Q: {} -> {:?}", q.prompt, outcome);
                            // Read the result screen for a couple of seconds
                            now += 2_000.0;
                            runner.acknowledge(now);
                            if outcome == Some(AnswerOutcome::Correct) {
                                log::info!("Now on level {}", runner.session().level());
                            }
                        }
                        GameEvent::PowerUpCollected { .. } => log::info!("Shield up"),
                        GameEvent::PowerLost => log::info!("Shield lost"),
                        other => log::debug!("{:?}", other),
                    }
                }
            }

            if let Some(summary) = runner.session().summary().copied() {
                println!(
                    "Run {}: score {} level {} xp {}",
                    run, summary.final_score, summary.final_level, summary.derived_xp
                );
            }
            if let Err(e) = runner.submit_rewards(&mut ledger) {
                log::warn!("Rewards not recorded: {}", e);
            }
            runner.reset();
            now += 1_000.0;
        }

        println!("Balance: {}  XP: {}", ledger.balance(), ledger.xp());
        if let Some(best) = ledger.leaderboard().top_score() {
            println!("Best: {}", best);
        }
        for (i, entry) in ledger.leaderboard().entries.iter().enumerate() {
            println!("#{:<2} {:>6}  level {}", i + 1, entry.score, entry.level);
        }
        ledger.leaderboard().save();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    quiz_runner::platform::init_logging();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm_start, this is just to satisfy the compiler
}
