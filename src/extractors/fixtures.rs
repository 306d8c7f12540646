// src/extractors/fixtures.rs
//! Report pages shaped like the live site, for tests. Row comments give the
//! document-order `<tr>` index each layout offset points at.

pub fn filler(count: usize) -> Vec<String> {
    (0..count).map(|_| "<tr><td>&nbsp;</td></tr>".to_string()).collect()
}

pub fn page_with_heading(heading: &str, rows: &[String]) -> String {
    format!(
        "<html><head><title>Real Estate</title></head><body><h1>{}</h1><table>{}</table></body></html>",
        heading,
        rows.concat()
    )
}

pub fn page(rows: &[String]) -> String {
    page_with_heading("Wake County Real Estate Data", rows)
}

fn rows_at(count: usize, placed: &[(usize, &str)]) -> Vec<String> {
    let mut rows = filler(count);
    for (index, row) in placed {
        rows[*index] = row.to_string();
    }
    rows
}

pub fn account_rows() -> Vec<String> {
    rows_at(
        23,
        &[
            (3, "<tr><td>Real Estate ID <b>0000042</b></td><td>PIN # <b>1703 12 3456</b></td></tr>"),
            (7, "<tr><td><b>123 MAIN ST</b></td><td><b>LO12  OAK\u{200B}HILLS</b></td></tr>"),
            (
                9,
                "<tr><td><b>Mailing</b></td><td><b>Location</b></td><td><b>PO BOX 1</b></td>\
                 <td><b> RALEIGH NC 27601 </b></td><td><b>&nbsp;</b></td><td><b>123 MAIN ST</b></td>\
                 <td><b>RALEIGH NC</b></td></tr>",
            ),
            (11, "<tr><td><b>DOE, JANE</b></td></tr>"),
            (
                22,
                "<tr><td><table>\
                   <tr><td>Heated Area</td><td><b>1,850</b></td></tr>\
                   <tr><td>Acreage</td><td><b>.25</b></td></tr>\
                   <tr><td>Spacer only</td></tr>\
                 </table></td></tr>",
            ),
        ],
    )
}

pub fn account_page() -> String {
    page(&account_rows())
}

pub fn building_page() -> String {
    page(&rows_at(
        16,
        &[
            (2, "<tr><td><b>Residential Card 01</b></td></tr>"),
            (4, "<tr><td>Year Built</td><td>1995</td></tr>"),
            (5, "<tr><td>Heated Area</td><td>1850</td></tr>"),
            (6, "<tr><td>Style</td><td>Ranch</td></tr>"),
            (7, "<tr><td>Bath</td><td></td></tr>"),
            (8, "<tr><td>Exterior</td><td>Vinyl</td><td>Units</td><td>1</td></tr>"),
            (9, "<tr><td>Orphan</td></tr>"),
            (
                15,
                "<tr><td>\
                   <table><tr><td>A</td><td>1</td><td>skip</td><td>Frame</td><td>FR</td><td>1200</td><td>Y</td></tr></table>\
                   <table><tr><td>B</td><td>2</td><td>x</td><td>Deck</td></tr></table>\
                 </td></tr>",
            ),
        ],
    ))
}

pub fn land_page() -> String {
    page(&rows_at(
        12,
        &[
            (2, "<tr><td>Land Class <b>R-4</b></td></tr>"),
            (4, "<tr><td>Acres</td><td><b>0.25</b></td></tr>"),
            (5, "<tr><td>Zoning</td><td><b>R-4</b></td><td><b>R-6</b></td></tr>"),
            (6, "<tr><td>Frontage</td><td>90</td></tr>"),
            (11, "<tr><td><b>$60,000</b></td></tr>"),
        ],
    ))
}

pub fn deeds_page() -> String {
    let mut rows = filler(2);
    rows.extend(
        [
            "<tr><td colspan=\"2\">Book&nbsp;Page</td><td>Date</td><td>Deed Type</td></tr>",
            "<tr><td>012345</td><td>00678</td><td>01/02/2003</td><td>WARRANTY DEED</td></tr>",
            "<tr><td></td><td></td><td></td><td></td></tr>",
            "<tr><td>011111</td><td>00222</td><td>05/06/1999</td></tr>",
        ]
        .map(String::from),
    );
    page(&rows)
}

pub fn notes_page() -> String {
    let mut rows = filler(2);
    rows.extend(
        [
            "<tr><th>Date</th><th>Note</th></tr>",
            "<tr><td>2020-01-01</td><td>Permit issued</td><td>extra</td></tr>",
            "<tr><td>&nbsp;</td><td></td></tr>",
        ]
        .map(String::from),
    );
    page(&rows)
}

pub fn sales_page() -> String {
    let mut rows = filler(3);
    rows.extend(
        [
            "<tr><td>Date</td><td>Amount</td></tr>",
            "<tr><td>2020-01-01</td><td>500</td></tr>",
            "<tr><td></td><td>200</td></tr>",
            "<tr><td> </td><td></td></tr>",
        ]
        .map(String::from),
    );
    page(&rows)
}

/// The placeholder the site serves for ids without data.
pub fn moved_page() -> String {
    "<html><head><title>Object moved</title></head><body><h1>Object Moved</h1>\
     This object may be found <a HREF=\"/realestate/Error.asp\">here</a>.</body></html>"
        .to_string()
}
