pub mod cli;

mod logging;
