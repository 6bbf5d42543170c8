use itertools::Itertools;
use std::io::{Read, Write};
use std::num::NonZeroU64;

use crate::chat::ChatExport;
use crate::error::ConvertError;
use crate::registry::NameRegistry;
use crate::transcript::{IndexEntry, TranscriptLine};

/// Drives a single conversion run. Operator-facing messages go to `console`.
pub struct Converter<C> {
    console: C,
    progress_interval: NonZeroU64,
    registry: NameRegistry,
}

impl<C: Write> Converter<C> {
    pub fn new(console: C, progress_interval: NonZeroU64) -> Self {
        Self {
            console,
            progress_interval,
            registry: NameRegistry::new(),
        }
    }

    /// Writes one transcript line per data row of `input` and returns the
    /// number of data rows.
    pub fn transcribe<R: Read, W: Write>(
        &mut self,
        input: R,
        transcript: &mut W,
    ) -> Result<u64, ConvertError> {
        let (mut export, header) = ChatExport::open(input)?;

        let Some(header) = header else {
            log::warn!("Chat file is empty");
            return Ok(0);
        };
        writeln!(self.console, "Columns are {}", header.iter().join(", "))?;

        let mut data_rows = 0;
        while let Some((row, chat_row)) = export.next_row()? {
            let index = self.registry.resolve(chat_row.name);
            writeln!(
                transcript,
                "{}",
                TranscriptLine {
                    index,
                    message: chat_row.message,
                }
            )?;
            data_rows += 1;

            if row % self.progress_interval.get() == 0 {
                write!(self.console, "\r{row} lines processed")?;
                self.console.flush()?;
            }
        }

        log::info!(
            "Transcribed {data_rows} rows from {} speakers",
            self.registry.len()
        );

        Ok(data_rows)
    }

    /// Writes every `(index, name)` pair seen so far and returns how many
    /// were written.
    pub fn write_index<W: Write>(&mut self, index_file: &mut W) -> Result<usize, ConvertError> {
        writeln!(
            self.console,
            "\nWriting {} indices to name index file",
            self.registry.len()
        )?;

        if self.registry.is_empty() {
            log::warn!("No speakers found, name index file left unchanged");
        }

        for (index, name) in self.registry.all_entries() {
            writeln!(index_file, "{}", IndexEntry { index, name })?;
        }

        Ok(self.registry.len())
    }
}
