use crate::domain::session::{SessionSnapshot, Status};
use crate::error::Result;
use crate::interfaces::display::Renderer;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct SnapshotRecord<'a> {
    status: Status,
    selected_item: Option<&'a str>,
    cash_amount: i64,
    change: i64,
    busy: bool,
}

impl<'a> From<&'a SessionSnapshot> for SnapshotRecord<'a> {
    fn from(snapshot: &'a SessionSnapshot) -> Self {
        Self {
            status: snapshot.status,
            selected_item: snapshot.selected_item.as_ref().map(|p| p.name.as_str()),
            cash_amount: snapshot.cash_amount.value(),
            change: snapshot.change.value(),
            busy: snapshot.busy,
        }
    }
}

/// Writes each snapshot as a CSV row
/// `status,selected_item,cash_amount,change,busy`, header first.
pub struct SnapshotWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_snapshot(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        self.writer.serialize(SnapshotRecord::from(snapshot))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}

impl<W: Write + Send> Renderer for SnapshotWriter<W> {
    fn render(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        self.write_snapshot(snapshot)
    }
}
