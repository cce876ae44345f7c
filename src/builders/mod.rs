// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules build things out of a `GitConfig` (documents,
// reports) or build a `GitConfig` out of something else.

// The `pub mod exporter;` declaration exposes the `exporter` module.
//
// `exporter` module:
// Defines the `ConfigExporter` trait and `DocumentExporter`, which renders a
// configuration as a JSON, YAML or TOML document while keeping section and
// variable order.
pub mod exporter;

// The `pub mod importer;` declaration exposes the `importer` module.
//
// `importer` module:
// The reverse of `exporter`: `ConfigImporter` and `DocumentImporter` read such
// a document and rebuild a `GitConfig`, rejecting values that are not plain
// scalars.
pub mod importer;

// The `pub mod reporter;` declaration exposes the `reporter` module.
//
// `reporter` module:
// Formats configuration entries for the terminal (`key=value` listings,
// regex lookups) and summarizes a configuration for the `check` command.
pub mod reporter;
