use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::config::CatalogueConfig;
use crate::error::{CatalogueError, Result};
use crate::prompt::Prompter;
use crate::query;
use crate::selection::Selection;
use crate::table::Table;

const BANNER: &str = "--- Welcome to the car catalogue! ---\n";
const MENU: &str = "Available Comparisons:\n0: Commuting Facts\n1: Compare Stats\n2: Pollution Facts\n3: Race!\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CommuteCost,
    Compare,
    Pollution,
    Race,
}

impl Command {
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            0 => Some(Command::CommuteCost),
            1 => Some(Command::Compare),
            2 => Some(Command::Pollution),
            3 => Some(Command::Race),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueAnswer {
    Quit,
    Again,
}

impl ContinueAnswer {
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "0" => Ok(ContinueAnswer::Quit),
            "1" => Ok(ContinueAnswer::Again),
            _ => Err(CatalogueError::invalid_input(token, "0 (done) or 1 (continue)")),
        }
    }
}

/// Menu choices must be integers; range is checked separately.
pub fn parse_choice(token: &str) -> Result<i64> {
    token
        .parse::<i64>()
        .map_err(|_| CatalogueError::invalid_input(token, "a comparison number"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    AwaitingCommand,
    AwaitingContinue,
    Finished,
}

pub struct Menu<'a, R, W> {
    table: &'a Table,
    config: &'a CatalogueConfig,
    prompter: Prompter<R, W>,
    selection: Selection,
    state: MenuState,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(table: &'a Table, config: &'a CatalogueConfig, prompter: Prompter<R, W>) -> Self {
        Self {
            table,
            config,
            prompter,
            selection: Selection::new(),
            state: MenuState::AwaitingCommand,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> MenuState {
        self.state
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Runs until the user answers `0` at the continue prompt. Any error ends
    /// the session.
    pub fn run(&mut self) -> Result<()> {
        while self.state != MenuState::Finished {
            self.step()?;
        }
        info!("session finished");
        Ok(())
    }

    pub fn step(&mut self) -> Result<MenuState> {
        self.state = match self.state {
            MenuState::AwaitingCommand => {
                self.prompter.say(BANNER)?;
                self.prompter.say(MENU)?;
                let token = self.prompter.ask("Please choose a comparison by number: ")?;
                let choice = parse_choice(&token)?;
                let outcome = match Command::from_choice(choice) {
                    Some(command) => {
                        debug!(?command, "running comparison");
                        self.execute(command)
                    }
                    None => self.prompter.say("Your choice was invalid."),
                };
                self.selection.clear();
                outcome?;
                MenuState::AwaitingContinue
            }
            MenuState::AwaitingContinue => {
                let token = self
                    .prompter
                    .ask("Are you done with the program? Enter 0 if yes, 1 if no. ")?;
                match ContinueAnswer::parse(&token)? {
                    ContinueAnswer::Quit => MenuState::Finished,
                    ContinueAnswer::Again => MenuState::AwaitingCommand,
                }
            }
            MenuState::Finished => MenuState::Finished,
        };
        Ok(self.state)
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let (table, config) = (self.table, self.config);
        match command {
            Command::CommuteCost => {
                let distance = self.prompter.ask_distance()?;
                let vehicle = self.prompter.ask_vehicle(table)?;
                let report = query::commute_cost(table, vehicle, distance, config)?;
                self.prompter.show(&report)
            }
            Command::Compare => {
                self.selection.rows = self.prompter.ask_rows(table)?;
                self.selection.columns = self.prompter.ask_columns(table)?;
                let report = query::compare(table, &self.selection)?;
                self.prompter.show(&report)
            }
            Command::Pollution => {
                let distance = self.prompter.ask_distance()?;
                self.selection.rows = self.prompter.ask_rows(table)?;
                let report = query::pollution(table, &self.selection, distance, config)?;
                self.prompter.show(&report)
            }
            Command::Race => {
                self.prompter.say("Let's race a 1/4 mile!\n")?;
                self.selection.rows = self.prompter.ask_rows(table)?;
                let report = query::race(table, &self.selection)?;
                self.prompter.show(&report)
            }
        }
    }
}
