//! Background instruction generation over channels
//!
//! A worker thread walks the document's shapes in render order and publishes
//! instructions and errors on two unbounded channels. Both channels close when
//! the worker finishes. Dropping the instruction receiver stops the worker at
//! its next send.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};
use log::debug;

use crate::document::Document;
use crate::error::SvgError;
use crate::instruction::Instruction;

/// Consumer side of a running generation
pub struct InstructionStream {
    pub instructions: Receiver<Instruction>,
    pub errors: Receiver<SvgError>,
    worker: Option<JoinHandle<()>>,
}

impl InstructionStream {
    /// Drain both channels to completion
    pub fn collect(mut self) -> (Vec<Instruction>, Vec<SvgError>) {
        let instructions: Vec<_> = self.instructions.iter().collect();
        let errors: Vec<_> = self.errors.iter().collect();
        self.join();
        (instructions, errors)
    }

    /// Wait for the worker thread to exit
    pub fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("instruction worker panicked");
            }
        }
    }
}

/// Start generating `document`'s instructions on a worker thread
pub fn spawn(document: Arc<Document>) -> InstructionStream {
    let (instruction_tx, instructions) = unbounded();
    let (error_tx, errors) = unbounded();

    let worker = thread::spawn(move || {
        debug!("streaming '{}'", document.name());
        let mut sent = 0usize;

        for id in document.shapes() {
            for result in document.shape_instructions(id).into_iter().flatten() {
                match result {
                    Ok(instruction) => {
                        if instruction_tx.send(instruction).is_err() {
                            debug!("consumer of '{}' went away after {} instructions", document.name(), sent);
                            return;
                        }
                        sent += 1;
                    }
                    Err(err) => {
                        // Nobody listening for errors is not a reason to stop
                        let _ = error_tx.send(err);
                    }
                }
            }
        }

        debug!("finished '{}': {} instructions", document.name(), sent);
    });

    InstructionStream {
        instructions,
        errors,
        worker: Some(worker),
    }
}

impl Document {
    /// Generate this document's instructions on a background thread
    pub fn stream(self: &Arc<Self>) -> InstructionStream {
        spawn(Arc::clone(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::InstructionKind;

    fn document(text: &str) -> Arc<Document> {
        Arc::new(Document::parse(text, "stream", 1.0).expect("Should parse"))
    }

    #[test]
    fn test_stream_matches_synchronous_generation() {
        let doc = document(
            r#"<svg><g><path d="M0 0 L1 1"/><rect width="2" height="2"/></g><circle r="1"/></svg>"#,
        );
        let expected = doc.instructions();
        assert_eq!(doc.stream().collect(), expected);
    }

    #[test]
    fn test_errors_arrive_on_their_own_channel() {
        let doc = document(r#"<svg><path d="M0 0 A1 1 0 0 0 1 1"/><path d="M2 2"/></svg>"#);
        let (instructions, errors) = doc.stream().collect();
        let kinds: Vec<_> = instructions.iter().map(Instruction::kind).collect();
        assert_eq!(
            kinds,
            vec![InstructionKind::Move, InstructionKind::Move, InstructionKind::Paint]
        );
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SvgError::UnsupportedCommand { command: 'A', .. }));
    }

    #[test]
    fn test_abandoned_consumer_stops_worker() {
        let data: String = (0..2000).map(|i| format!("L{} {} ", i, i)).collect();
        let doc = document(&format!(r#"<svg><path d="M0 0 {}"/></svg>"#, data));

        let mut stream = doc.stream();
        let first = stream.instructions.recv().expect("first instruction");
        assert_eq!(first.kind(), InstructionKind::Move);

        let InstructionStream {
            instructions,
            errors,
            mut worker,
        } = stream;
        drop(instructions);
        drop(errors);

        // The worker must terminate instead of blocking
        if let Some(handle) = worker.take() {
            handle.join().expect("worker exits cleanly");
        }
    }

    #[test]
    fn test_dropped_error_receiver_keeps_instructions_flowing() {
        let doc = document(r#"<svg><path d="M0 0 Z Z 1"/><path d="M3 3"/></svg>"#);
        let stream = doc.stream();
        drop(stream.errors);
        let instructions: Vec<_> = stream.instructions.iter().collect();
        assert_eq!(instructions.last().map(Instruction::kind), Some(InstructionKind::Paint));
        assert_eq!(instructions.len(), 5);
    }
}
