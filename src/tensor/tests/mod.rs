mod activation;
mod shape;
