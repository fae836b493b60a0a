mod cycle;
mod validate;
