use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::error::{CatalogueError, Result};
use crate::selection::{parse_index, select_columns, select_rows};
use crate::table::{Table, TableOperation};

/// Line-oriented terminal adapter. Every prompt blocks until one line of
/// input arrives.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn show(&mut self, report: &impl Display) -> Result<()> {
        write!(self.output, "{}", report)?;
        self.output.flush()?;
        Ok(())
    }

    /// Prints `prompt` and returns the next trimmed line. A closed input is
    /// an invalid (empty) answer.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CatalogueError::invalid_input("", "a response before end of input"));
        }
        Ok(line.trim().to_string())
    }

    pub fn list_models(&mut self, table: &Table) -> Result<()> {
        for row in 0..table.row_count() {
            writeln!(self.output, "{:>4}  {}", row, table.record(row).model_name())?;
        }
        Ok(())
    }

    pub fn list_columns(&mut self, table: &Table) -> Result<()> {
        for (idx, name) in table.column_names().iter().enumerate() {
            writeln!(self.output, "{:>4}  {}", idx, name)?;
        }
        Ok(())
    }

    pub fn ask_distance(&mut self) -> Result<f64> {
        let token = self.ask(
            "\n--- Please enter the distance of your daily commute in kilometers (km) ---\n1 mile = 1.60934 km\n",
        )?;
        parse_distance(&token)
    }

    pub fn ask_rows(&mut self, table: &Table) -> Result<Vec<usize>> {
        self.list_models(table)?;
        let answer = self.ask("\n--- Please enter the index numbers for the cars you would like to select separated by commas. ---\n")?;
        select_rows(table, &answer)
    }

    pub fn ask_columns(&mut self, table: &Table) -> Result<Vec<String>> {
        self.list_columns(table)?;
        let answer = self.ask("\n--- Please enter the index numbers for the columns you would like to select separated by commas. ---\n")?;
        select_columns(table, &answer)
    }

    pub fn ask_vehicle(&mut self, table: &Table) -> Result<usize> {
        self.list_models(table)?;
        let answer = self.ask("\nPlease select your commuter vehicle by index number:\n")?;
        parse_index(&answer, table.row_count())
            .map_err(|_| CatalogueError::invalid_input(answer, "a vehicle index from the list"))
    }
}

/// Accepts plain non-negative finite decimals such as `12` or `12.5`.
pub fn parse_distance(token: &str) -> Result<f64> {
    let invalid = || CatalogueError::invalid_input(token, "a distance in km, e.g. 12.5");
    let plain = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && token.bytes().filter(|&b| b == b'.').count() <= 1
        && token.bytes().any(|b| b.is_ascii_digit());
    if !plain {
        return Err(invalid());
    }
    match token.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(invalid()),
    }
}
