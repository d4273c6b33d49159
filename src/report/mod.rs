mod synthesizer;
mod wrap;

pub use synthesizer::ReportSynthesizer;
