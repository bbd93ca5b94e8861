mod layer_embedding;
mod stacked_cell;
