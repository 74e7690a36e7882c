//! In-memory layout: named cells holding merged regions per layer.

use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::error::LayoutError;
use crate::region::{Quantizer, Region};

slotmap::new_key_type! {
    /// Unique identifier for a cell in a [`Layout`].
    pub struct CellId;
}

/// A GDS layer/datatype pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerInfo {
    pub layer: u16,
    pub datatype: u16,
}

impl LayerInfo {
    #[must_use]
    pub fn new(layer: u16, datatype: u16) -> Self {
        Self { layer, datatype }
    }
}

/// One layer of a cell.
#[derive(Debug, Clone)]
pub struct Layer {
    pub info: LayerInfo,
    /// Position in creation order within the cell.
    pub index: usize,
    pub name: Option<String>,
    pub region: Region,
}

/// A named container of layers.
#[derive(Debug, Clone)]
pub struct Cell {
    name: String,
    layers: Vec<Layer>,
}

impl Cell {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layers in index order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, info: LayerInfo) -> Option<&Layer> {
        self.layers.iter().find(|l| l.info == info)
    }

    /// The merged region on `info`, if the layer exists.
    #[must_use]
    pub fn region(&self, info: LayerInfo) -> Option<&Region> {
        self.layer(info).map(|l| &l.region)
    }

    fn ensure_layer(&mut self, info: LayerInfo, name: Option<&str>, quantizer: Quantizer) -> usize {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.info == info) {
            if let Some(name) = name {
                if layer.name.as_deref() != Some(name) {
                    warn!(
                        cell = %self.name,
                        layer = info.layer,
                        datatype = info.datatype,
                        old = ?layer.name,
                        new = name,
                        "renaming existing layer"
                    );
                    layer.name = Some(name.to_string());
                }
            }
            return layer.index;
        }
        let index = self.layers.len();
        self.layers.push(Layer {
            info,
            index,
            name: name.map(str::to_string),
            region: Region::empty(quantizer),
        });
        debug!(cell = %self.name, layer = info.layer, datatype = info.datatype, index, "layer created");
        index
    }
}

/// Arena of cells addressed by [`CellId`] or by name.
#[derive(Debug)]
pub struct Layout {
    quantizer: Quantizer,
    cells: SlotMap<CellId, Cell>,
    by_name: HashMap<String, CellId>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Quantizer::default())
    }
}

impl Layout {
    #[must_use]
    pub fn new(quantizer: Quantizer) -> Self {
        Self {
            quantizer,
            cells: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }

    #[must_use]
    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Creates a cell, or returns the existing one with the same name.
    pub fn create_cell(&mut self, name: &str) -> CellId {
        self.get_or_create_cell(name)
    }

    #[must_use]
    pub fn cell_by_name(&self, name: &str) -> Option<CellId> {
        self.by_name.get(name).copied()
    }

    pub fn get_or_create_cell(&mut self, name: &str) -> CellId {
        if let Some(id) = self.cell_by_name(name) {
            return id;
        }
        let id = self.cells.insert(Cell {
            name: name.to_string(),
            layers: Vec::new(),
        });
        self.by_name.insert(name.to_string(), id);
        debug!(cell = name, "cell created");
        id
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::CellNotFound`] if `id` is stale.
    pub fn cell(&self, id: CellId) -> Result<&Cell, LayoutError> {
        self.cells
            .get(id)
            .ok_or_else(|| LayoutError::CellNotFound(format!("{id:?}")))
    }

    fn cell_mut(&mut self, id: CellId) -> Result<&mut Cell, LayoutError> {
        self.cells
            .get_mut(id)
            .ok_or_else(|| LayoutError::CellNotFound(format!("{id:?}")))
    }

    /// Iterates over all cells in arbitrary order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter()
    }

    /// Creates a layer in `cell`, or returns the index of the existing one.
    /// A differing `name` renames an existing layer.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::CellNotFound`] if `cell` is stale.
    pub fn create_layer(&mut self, cell: CellId, info: LayerInfo, name: Option<&str>) -> Result<usize, LayoutError> {
        let quantizer = self.quantizer;
        Ok(self.cell_mut(cell)?.ensure_layer(info, name, quantizer))
    }

    /// Index of `info` in `cell`, if the layer exists.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::CellNotFound`] if `cell` is stale.
    pub fn layer_index(&self, cell: CellId, info: LayerInfo) -> Result<Option<usize>, LayoutError> {
        Ok(self.cell(cell)?.layer(info).map(|l| l.index))
    }

    /// Unions `region` into layer `info` of `cell`, creating the layer if
    /// needed. Returns the layer index.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::CellNotFound`] if `cell` is stale.
    pub fn add_region(&mut self, cell: CellId, info: LayerInfo, region: &Region) -> Result<usize, LayoutError> {
        let quantizer = self.quantizer;
        let target = self.cell_mut(cell)?;
        let index = target.ensure_layer(info, None, quantizer);
        let layer = &mut target.layers[index];
        layer.region = &layer.region + region;
        Ok(index)
    }

    /// Text dump of the layer table of `cell`, one `layer datatype index name`
    /// line per layer after a two-line header.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::CellNotFound`] if `cell` is stale.
    pub fn layer_mapping(&self, cell: CellId) -> Result<String, LayoutError> {
        let mut out = String::from("# Layer Mapping\n# Format: layer_num datatype index name\n");
        for layer in self.cell(cell)?.layers() {
            out.push_str(&format!(
                "{} {} {} {}\n",
                layer.info.layer,
                layer.info.datatype,
                layer.index,
                layer.name.as_deref().unwrap_or_default()
            ));
        }
        Ok(out)
    }
}
