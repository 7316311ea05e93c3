pub mod sink;

pub use sink::{Artifact, ArtifactKind, ArtifactSink, FileSink, StdoutSink};
