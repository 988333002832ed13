//! Dependency validation over generated stage chains.

use std::path::PathBuf;

use gpa_core::{Pipeline, PipelineContext, PipelineError, Stage, StageDescriptor};
use proptest::prelude::*;

struct Passthrough(StageDescriptor);

impl Stage for Passthrough {
    fn descriptor(&self) -> &StageDescriptor {
        &self.0
    }

    fn execute(&self, mut context: PipelineContext) -> anyhow::Result<PipelineContext> {
        for output in self.0.outputs() {
            self.0.store(&mut context, output, Vec::<PathBuf>::new())?;
        }
        Ok(context)
    }
}

/// Stage `i` reads the keys of a subset of earlier stages and writes `key_i`.
fn chain(consumes: &[Vec<usize>]) -> Vec<Box<dyn Stage>> {
    consumes
        .iter()
        .enumerate()
        .map(|(idx, inputs)| {
            let mut descriptor = StageDescriptor::new(format!("stage_{idx}"));
            for input in inputs {
                descriptor = descriptor.input(format!("key_{input}"));
            }
            Box::new(Passthrough(descriptor.output(format!("key_{idx}")))) as Box<dyn Stage>
        })
        .collect()
}

fn consumes() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2usize..8).prop_flat_map(|len| {
        (0..len)
            .map(|idx| {
                if idx == 0 {
                    Just(Vec::<usize>::new()).boxed()
                } else {
                    prop::collection::vec(0..idx, 0..=idx.min(3)).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn forward_chains_validate_and_run(consumes in consumes()) {
        let pipeline = Pipeline::new("generated", chain(&consumes));
        prop_assert!(pipeline.validate().is_ok());

        let summary = pipeline.run("generated_run").unwrap();
        prop_assert_eq!(summary.stages.len(), consumes.len());
        prop_assert_eq!(summary.context.len(), consumes.len());
    }

    #[test]
    fn removing_a_producer_names_the_missing_key(
        consumes in consumes(),
        pick in any::<prop::sample::Index>(),
    ) {
        let consumed: Vec<usize> = consumes.iter().flatten().copied().collect();
        prop_assume!(!consumed.is_empty());
        let removed = consumed[pick.index(consumed.len())];

        let mut stages = chain(&consumes);
        stages.remove(removed);
        let pipeline = Pipeline::new("generated", stages);

        match pipeline.validate() {
            Err(PipelineError::Dependency { key, .. }) => {
                prop_assert_eq!(key, format!("key_{removed}"));
            }
            other => prop_assert!(false, "unexpected validation result: {:?}", other),
        }
    }
}
