use anyhow::{Context, Result, anyhow};
use comfy_table::CellAlignment;
use tracing::info;

use choro_cli::workflow::{MapRequest, PreparedMap, SchemeRequest, build_scheme, prepare_map};
use choro_core::Legend;
use choro_ingest::{AttributeTable, CsvOptions, GeoLoadOptions, GeoTable};
use choro_model::ClassificationMode;
use choro_output::{Exporter, GeoJsonExporter};
use choro_scheme::{load_scheme, save_scheme};

use crate::cli::{
    ClassifyArgs, ClassifyFormatArg, ColumnsArgs, ExportArgs, MapArgs, ModeArg, SchemeNewArgs,
    SchemeShowArgs,
};
use crate::tables::{align_column, dim_cell, new_table, value_cell};

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    // Listing columns never needs projected coordinates.
    let options = GeoLoadOptions { reproject: false };
    let geo = GeoTable::load(&args.geo, &options)
        .with_context(|| format!("load region layer {}", args.geo.display()))?;

    println!("Region layer: {}", args.geo.display());
    let mut table = new_table(&["Column", "Role"]);
    for column in geo.columns() {
        let role = if geo.key_column() == Some(column.as_str()) {
            dim_cell("default key")
        } else {
            dim_cell("")
        };
        table.add_row(vec![column.into(), role]);
    }
    println!("{table}");

    if let Some(path) = &args.csv {
        let options = CsvOptions {
            delimiter: args.delimiter,
        };
        let attrs = AttributeTable::load(path, &options)
            .with_context(|| format!("load attribute table {}", path.display()))?;
        let (key, value) = attrs.infer_key_and_value_columns();

        println!("Attribute table: {} ({} rows)", path.display(), attrs.len());
        let mut table = new_table(&["Column", "Role"]);
        for column in attrs.columns() {
            let role = match (Some(column.as_str()) == key, Some(column.as_str()) == value) {
                (true, _) => "inferred key",
                (_, true) => "inferred value",
                _ => "",
            };
            table.add_row(vec![column.into(), dim_cell(role)]);
        }
        println!("{table}");
    }
    Ok(())
}

pub fn run_classify(args: &ClassifyArgs) -> Result<()> {
    let prepared = prepare_map(&map_request(&args.map))?;
    match args.format {
        ClassifyFormatArg::Json => {
            let document = serde_json::json!({
                "columns": {
                    "key_geo": prepared.columns.key_geo,
                    "key_csv": prepared.columns.key_csv,
                    "value": prepared.columns.value,
                },
                "join": prepared.report,
                "plan": prepared.plan,
            });
            let text = serde_json::to_string_pretty(&document).context("serialize plan")?;
            println!("{text}");
        }
        ClassifyFormatArg::Table => print_classification(&prepared),
    }
    Ok(())
}

pub fn run_export(args: &ExportArgs) -> Result<()> {
    let prepared = prepare_map(&map_request(&args.map))?;
    let geo = prepared
        .session
        .geo()
        .ok_or_else(|| anyhow!("no region layer loaded"))?;
    GeoJsonExporter
        .export(geo, &prepared.plan, &args.output)
        .with_context(|| format!("export map to {}", args.output.display()))?;
    print_join_summary(&prepared);
    println!(
        "Exported {} regions to {}",
        prepared.plan.regions.len(),
        args.output.display()
    );
    Ok(())
}

pub fn run_scheme_new(args: &SchemeNewArgs) -> Result<()> {
    let request = SchemeRequest {
        mode: match args.mode {
            ModeArg::Bins => ClassificationMode::Bins,
            ModeArg::Exact => ClassificationMode::Exact,
        },
        bins: args.bins.clone(),
        exact_values: args.exact_values.clone(),
        no_data_color: args.no_data_color.clone(),
        edge_color: args.edge_color.clone(),
        edge_width: args.edge_width,
    };
    let (rules, style) = build_scheme(&request)?;
    save_scheme(&args.output, &rules, &style)
        .with_context(|| format!("save scheme {}", args.output.display()))?;
    info!(path = %args.output.display(), "scheme written");
    println!("Saved scheme to {}", args.output.display());
    Ok(())
}

pub fn run_scheme_show(args: &SchemeShowArgs) -> Result<()> {
    let (rules, style) = load_scheme(&args.path)
        .with_context(|| format!("load scheme {}", args.path.display()))?;

    println!("Scheme: {}", args.path.display());
    println!("Mode: {}", rules.mode.as_str());
    println!("Outline: {} width {}", style.edge_color, style.edge_width);
    let mut table = new_table(&["Legend", "Color"]);
    for entry in Legend::from_rules(&rules, &style).entries {
        table.add_row(vec![entry.label, entry.color.to_string()]);
    }
    println!("{table}");
    Ok(())
}

fn map_request(args: &MapArgs) -> MapRequest {
    MapRequest {
        geo: args.geo.clone(),
        csv: args.csv.clone(),
        scheme: args.scheme.clone(),
        key_geo: args.key_geo.clone(),
        key_csv: args.key_csv.clone(),
        value: args.value.clone(),
        edits: args.edits.clone(),
        geo_options: GeoLoadOptions {
            reproject: !args.no_reproject,
        },
        csv_options: CsvOptions {
            delimiter: args.delimiter,
        },
    }
}

fn print_classification(prepared: &PreparedMap) {
    print_join_summary(prepared);
    let mut table = new_table(&["Region", "Value", "Color"]);
    for region in &prepared.plan.regions {
        let key = region
            .key
            .clone()
            .unwrap_or_else(|| format!("#{}", region.index));
        let color = if region.missing {
            dim_cell(region.fill.as_str())
        } else {
            region.fill.as_str().into()
        };
        table.add_row(vec![key.into(), value_cell(region.value), color]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    println!("{table}");
}

fn print_join_summary(prepared: &PreparedMap) {
    let report = &prepared.report;
    let columns = &prepared.columns;
    println!(
        "Joined {} on {} = {}: {} of {} regions matched, {} unmatched, {} non-numeric",
        columns.value,
        columns.key_geo,
        columns.key_csv,
        report.matched,
        report.regions,
        report.unmatched,
        report.non_numeric
    );
    if prepared.plan.missing_count() > 0 {
        println!("{} regions have no data", prepared.plan.missing_count());
    }
}
