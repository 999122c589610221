use comfy_table::presets::UTF8_NO_BORDERS;
use comfy_table::{Cell, ContentArrangement, Table};

use crate::value::Face;
use crate::{Die, FrequencyTable, Jackpots, NarrowTable, OutcomeTable, TrialTable, View};

const ROLL_NUMBER: &str = "roll number";

/// Plain-text tables for dice, trials and statistics.
pub trait PrintExt {
    fn table(&self) -> String;

    fn print_table(&self) {
        print!("{}", self.table());
    }
}

fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.into_iter().map(Into::into).collect::<Vec<Cell>>());
    table
}

impl<T> PrintExt for Die<T>
where
    T: Face,
{
    fn table(&self) -> String {
        let mut table = new_table(["faces", "weights"]);
        for (face, weight) in self {
            table.add_row(vec![Cell::new(face), Cell::new(weight)]);
        }
        format!("{table}\n")
    }
}

impl<T> PrintExt for TrialTable<T>
where
    T: Face,
{
    fn table(&self) -> String {
        let header = std::iter::once(ROLL_NUMBER.to_string()).chain(self.columns());
        let mut table = new_table(header);
        for (trial, row) in self.iter() {
            table.add_row(std::iter::once(Cell::new(trial)).chain(row.iter().map(Cell::new)));
        }
        format!("{table}\n")
    }
}

impl<T> PrintExt for NarrowTable<T>
where
    T: Face,
{
    fn table(&self) -> String {
        let mut table = new_table([ROLL_NUMBER, "die number", "face rolled"]);
        for row in self.iter() {
            table.add_row(vec![
                Cell::new(row.trial),
                Cell::new(format!("Die {}", row.die)),
                Cell::new(&row.face),
            ]);
        }
        format!("{table}\n")
    }
}

impl<T> PrintExt for View<'_, T>
where
    T: Face,
{
    fn table(&self) -> String {
        match self {
            View::Wide(table) => table.table(),
            View::Narrow(table) => table.table(),
        }
    }
}

impl<T> PrintExt for FrequencyTable<T>
where
    T: Face,
{
    fn table(&self) -> String {
        let header = std::iter::once(ROLL_NUMBER.to_string())
            .chain(self.faces().iter().map(ToString::to_string));
        let mut table = new_table(header);
        for (trial, row) in self.iter() {
            table.add_row(std::iter::once(trial).chain(row.iter().copied()).map(Cell::new));
        }
        format!("{table}\n")
    }
}

impl<T> PrintExt for Jackpots<T>
where
    T: Face,
{
    fn table(&self) -> String {
        format!("Jackpots: {}\n\n{}", self.count(), self.table().table())
    }
}

impl<T> PrintExt for OutcomeTable<T>
where
    T: Face,
{
    fn table(&self) -> String {
        let header = (1..=self.dice())
            .map(|i| format!("Die {i}"))
            .chain(std::iter::once("count".to_string()));
        let mut table = new_table(header);
        for (outcome, count) in self {
            table.add_row(outcome.iter().map(Cell::new).chain(std::iter::once(Cell::new(count))));
        }
        format!(
            "Outcomes: {} | Rolled: {}\n\n{table}\n",
            self.len(),
            self.observed()
        )
    }
}
