pub mod heuristic_scanner;
