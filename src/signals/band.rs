/**
* filename : band
* author : HAMA
* date: 2025. 5. 12.
* description: 순서가 있는 구간 분류기 (첫 번째로 일치하는 구간 채택)
**/

use super::signal_types::{Direction, Verdict};

pub struct Band<T> {
  matches: fn(&T) -> bool,
  pub verdict: Verdict,
}

/// 구간 목록을 위에서부터 순서대로 평가한다. 마지막에는 항상 기본 구간이 있다.
pub struct BandClassifier<T> {
  bands: Vec<Band<T>>,
  fallback: Verdict,
}

pub struct BandClassifierBuilder<T> {
  bands: Vec<Band<T>>,
}

impl<T> BandClassifier<T> {
  pub fn builder() -> BandClassifierBuilder<T> {
    BandClassifierBuilder { bands: Vec::new() }
  }

  pub fn classify(&self, input: &T) -> Verdict {
    self.bands
      .iter()
      .find(|band| (band.matches)(input))
      .map(|band| band.verdict)
      .unwrap_or(self.fallback)
  }
}

impl<T> BandClassifierBuilder<T> {
  pub fn band(mut self, matches: fn(&T) -> bool, signal: &'static str, direction: Direction, score: u8) -> Self {
    self.bands.push(Band {
      matches,
      verdict: Verdict::new(signal, direction, score),
    });
    self
  }

  pub fn otherwise(self, signal: &'static str, direction: Direction, score: u8) -> BandClassifier<T> {
    BandClassifier {
      bands: self.bands,
      fallback: Verdict::new(signal, direction, score),
    }
  }
}
