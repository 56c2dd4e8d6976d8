use colored::Colorize;
use thiserror::Error;

use crate::{
    Classifier,
    Trainer,
    TrainError,
    WeakLearner,
};
use super::loss_functions::training_error;

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::Instant;
use std::ops::ControlFlow;

const DEFAULT_ROUND: usize = 100;
const DEFAULT_MAX_ROUNDS: usize = 100;
const DEFAULT_TIMELIMIT_MILLIS: u128 = u128::MAX;
const WIDTH: usize = 8;
const PREC_WIDTH: usize = 5;
const FULL_WIDTH: usize = 60;
const STAT_WIDTH: usize = (FULL_WIDTH - 4) / 2;
const HEADER: &str = "Round,Loss,ExpLoss,TrainError,TestError,Time\n";


/// Errors reported by [`Logger::run`].
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Creating or writing the log file failed.
    #[error("Failed to write the log: {0}")]
    Io(#[from] std::io::Error),

    /// A boosting round failed.
    #[error(transparent)]
    Train(#[from] TrainError),
}


/// Struct `Logger` runs a [`Trainer`] and
/// logs the round loss, the exponential loss,
/// the train/test error, and the running time
/// of each round, both to the terminal and to a CSV file.
pub struct Logger<'a, L: WeakLearner> {
    trainer: &'a mut Trainer<L>,
    test: Option<(&'a [L::Sample], &'a [L::Sample])>,
    max_rounds: usize,
    time_limit: u128,
    round: usize,
}


impl<'a, L: WeakLearner> Logger<'a, L> {
    /// Create a new instance of `Logger`.
    pub fn new(trainer: &'a mut Trainer<L>) -> Self {
        Self {
            trainer,
            test: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
            time_limit: DEFAULT_TIMELIMIT_MILLIS,
            round: DEFAULT_ROUND,
        }
    }


    /// Set held-out samples to report the test error on.
    pub fn test_samples(
        mut self,
        positives: &'a [L::Sample],
        negatives: &'a [L::Sample],
    ) -> Self
    {
        self.test = Some((positives, negatives));
        self
    }


    /// Set the maximal number of rounds. Default is `100`.
    #[inline(always)]
    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }


    /// Set the time limit as milliseconds.
    /// Once the cumulative time exceeds the limit,
    /// the logger stops after the current round.
    #[inline(always)]
    pub fn time_limit_as_millis(mut self, time_limit: u128) -> Self {
        self.time_limit = time_limit;
        self
    }


    /// Set the time limit as seconds.
    #[inline(always)]
    pub fn time_limit_as_secs(mut self, time_limit: u64) -> Self {
        self.time_limit = time_limit as u128 * 1_000;
        self
    }


    /// Set the interval to print the current status.
    /// By default, the method `run` prints its status every `100` rounds.
    /// If you don't want to print the log,
    /// set `usize::MAX`.
    #[inline(always)]
    pub fn print_every(mut self, round: usize) -> Self {
        self.round = round;
        self
    }


    #[inline(always)]
    fn verbose(&self) -> bool {
        self.round != usize::MAX
    }


    #[inline(always)]
    fn print_log_header(&self) {
        println!(
            "      {:>WIDTH$}\t\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}",
            "".bold().red(),
            "".bold().blue(),
            "TRAIN".bold().green(),
            "TEST".bold().yellow(),
            "ACC.".bold().cyan(),
        );
        println!(
            "      {:>WIDTH$}\t\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\t{:>WIDTH$}\n",
            "ROUND".bold().red(),
            "LOSS".bold().blue(),
            "ERROR".bold().green(),
            "ERROR".bold().yellow(),
            "TIME".bold().cyan(),
        );
    }


    /// Print the current settings.
    fn print_stats(&self) {
        let limit = if self.time_limit != u128::MAX {
            time_format(self.time_limit)
        } else {
            "Nothing".into()
        };
        let options = self.trainer.current_options();

        let header = format!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", "STATS".bold(), "",
        );
        println!(
            "\n{header}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
            "# of positives".bold(),
            self.trainer.n_positives().to_string().bold().green(),
            "# of negatives".bold(),
            self.trainer.n_negatives().to_string().bold().green(),
            "Smoothing".bold(),
            options.smoothing.to_string().bold().green(),
            "Threshold sweep".bold(),
            format!("{:?}", options.threshold_sweep).bold().green(),
        );

        for learner in self.trainer.learners() {
            println!(
                "+ {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
                "Weak Learner".bold(),
                learner.name().bold().green(),
            );
            if let Some(info) = learner.info() {
                let line = info.into_iter()
                    .map(|(key, val)| {
                        format!(
                            "    + {:<STAT_WIDTH$}\t{:>width$}",
                            key,
                            val.bold().yellow(),
                            width = STAT_WIDTH - 8
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                println!("{line}");
            }
        }
        println!(
            "\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            {:=^FULL_WIDTH$}\n\
            ",
            "Time Limit".bold(),
            limit.bold().green(),
            "".bold(),
        );
    }


    /// Run the trainer with logging,
    /// writing one CSV line per round to `filename`.
    ///
    /// Stops at the round budget, at the time limit,
    /// or once a round reaches zero loss.
    /// If a round finds no layer,
    /// the logger stops and returns the classifier trained so far.
    pub fn run<P: AsRef<Path>>(&mut self, filename: P)
        -> Result<Classifier<L>, LoggerError>
    {
        // Open file
        let mut file = File::create(filename)?;

        // Write header to the file
        file.write_all(HEADER.as_bytes())?;

        if self.verbose() {
            self.print_stats();
            self.print_log_header();
        }

        // Cumulative time
        let mut time_acc = 0;

        let flow = (1..=self.max_rounds).try_for_each(|iter| {
            // Start measuring time
            let now = Instant::now();

            let loss = match self.trainer.add_layer() {
                Ok(loss) => loss,
                Err(e) => return ControlFlow::Break(Err(LoggerError::from(e))),
            };

            // Stop measuring and convert `Duration` to Milliseconds.
            time_acc += now.elapsed().as_millis();

            let exp_loss = self.trainer.exponential_loss();
            let train = self.trainer.training_error();
            let test = self.test.map(|(pos, neg)| {
                let f = self.trainer.classifier();
                training_error(&f, pos, neg)
            });
            let test_field = test.map(|t| t.to_string())
                .unwrap_or_default();
            let test = test.unwrap_or(f64::NAN);

            let line = format!(
                "{iter},{loss},{exp_loss},{train},{test_field},{time_acc}\n"
            );
            if let Err(e) = file.write_all(line.as_bytes()) {
                return ControlFlow::Break(Err(LoggerError::from(e)));
            }

            let finished = !loss.is_finite() || loss == 0.0;

            if time_acc > self.time_limit {
                println!(
                    "{} {}\t\t{}\t{}\t{}\t{}\n",
                    "[TLE]".bold().bright_red(),
                    format!("{:>WIDTH$}", iter).bold().red(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", loss).bold().blue(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", train).bold().green(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", test).bold().yellow(),
                    time_format(time_acc).bold().cyan(),
                );
                return ControlFlow::Break(Ok(()));
            }

            if self.verbose() && iter % self.round == 0 {
                println!(
                    "{} {}\t\t{}\t{}\t{}\t{}",
                    "[LOG]".bold().magenta(),
                    format!("{:>WIDTH$}", iter).red(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", loss).blue(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", train).green(),
                    format!("{:>WIDTH$.PREC_WIDTH$}", test).yellow(),
                    time_format(time_acc).bold().cyan(),
                );
            }

            if finished {
                if self.verbose() {
                    println!(
                        "{} {}\t\t{}\t{}\t{}\t{}\n",
                        "[FIN]".bold().bright_green(),
                        format!("{:>WIDTH$}", iter).red(),
                        format!("{:>WIDTH$.PREC_WIDTH$}", loss).bold().blue(),
                        format!("{:>WIDTH$.PREC_WIDTH$}", train).bold().green(),
                        format!("{:>WIDTH$.PREC_WIDTH$}", test).bold().yellow(),
                        time_format(time_acc).bold().cyan(),
                    );
                }
                return ControlFlow::Break(Ok(()));
            }

            ControlFlow::Continue(())
        });

        if let ControlFlow::Break(Err(e)) = flow {
            return Err(e);
        }

        Ok(self.trainer.classifier())
    }
}


fn time_format(millisec: u128) -> String {
    if millisec < 1_000 {
        return format!("  0.{:0>3}s", millisec);
    }
    let sec = millisec / 1_000;
    let millisec = millisec % 1_000;
    if sec < 60 {
        return format!(" {:0>2}.{:0>3}s", sec, millisec);
    }
    let min = sec / 60;
    let sec = sec % 60;
    if min < 60 {
        return format!(" {:0>2}m {:0>2}s", min, sec);
    }
    let hours = min / 60;
    let min = min % 60;
    format!(" {:0>2}h {:0>2}m", hours, min)
}
