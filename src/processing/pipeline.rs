// src/processing/pipeline.rs
use crate::catalog::Catalog;
use crate::error::Result;
use crate::processing::derive::IndexDeriver;
use crate::processing::extract::BandExtractor;
use crate::processing::indices::LaiModel;
use crate::processing::scaling::RadiometricScaler;
use crate::scene::Scene;

/// Scale -> derive -> extract, one scene at a time
pub struct LaiPipeline {
    scaler: RadiometricScaler,
    deriver: IndexDeriver,
    extractor: BandExtractor,
}

impl LaiPipeline {
    pub fn new(scaler: RadiometricScaler, deriver: IndexDeriver, extractor: BandExtractor) -> Self {
        Self {
            scaler,
            deriver,
            extractor,
        }
    }

    pub fn with_model(model: LaiModel) -> Self {
        Self::new(
            RadiometricScaler::landsat_c2l2(),
            IndexDeriver::landsat(model),
            BandExtractor::lai(),
        )
    }

    pub fn scaler(&self) -> &RadiometricScaler {
        &self.scaler
    }

    pub fn deriver(&self) -> &IndexDeriver {
        &self.deriver
    }

    pub fn extractor(&self) -> &BandExtractor {
        &self.extractor
    }

    /// Run every stage on one raw scene
    pub fn process_scene(&self, scene: Scene) -> Result<Scene> {
        let scaled = self.scaler.scale(&scene);
        let derived = self.deriver.derive(&scaled)?;
        self.extractor.extract(&derived)
    }

    /// Lazily process `scenes`, preserving their order.
    ///
    /// Each item carries its own result, so a failing scene does not stop
    /// the ones after it.
    pub fn run<'a, I>(&'a self, scenes: I) -> impl Iterator<Item = Result<Scene>> + 'a
    where
        I: IntoIterator<Item = Scene>,
        I::IntoIter: 'a,
    {
        scenes.into_iter().map(move |scene| self.process_scene(scene))
    }

    /// Like [`run`](Self::run), loading each scene's bands from `catalog`
    /// just before it is processed. Raw bands are released once the scene's
    /// LAI band has been extracted.
    pub fn run_from<'a, C, I>(
        &'a self,
        catalog: &'a C,
        scenes: I,
    ) -> impl Iterator<Item = Result<Scene>> + 'a
    where
        C: Catalog + ?Sized,
        I: IntoIterator<Item = Scene>,
        I::IntoIter: 'a,
    {
        scenes
            .into_iter()
            .map(move |scene| catalog.load_bands(scene).and_then(|scene| self.process_scene(scene)))
    }
}

impl Default for LaiPipeline {
    fn default() -> Self {
        Self::with_model(LaiModel::default())
    }
}
