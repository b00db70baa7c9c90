/*!

This is the long-form manual for `village_profile` and `profildesa`.

## Input formats

The following providers are supported by `profildesa`:
* `gsheet` a Google Sheets tab published to the web as CSV (default)
* `csv` a CSV file on disk, usually a downloaded copy of a published tab
* `xlsx` an Excel workbook, usually the whole spreadsheet downloaded as `.xlsx`

### `gsheet`

Publish the spreadsheet with "File > Share > Publish to web", format CSV. The
published URL ends with `pub?output=csv`. Every tab of the spreadsheet has a
`gid` (visible in the address bar when the tab is open); it is appended to the
URL to read this tab.

### `csv`

The CSV reader is permissive. It does not reject any input:

- double quotes start a quoted field, in which commas and line breaks are
  kept. Two double quotes in a quoted field stand for one double quote;
- `\r` characters outside of quotes are dropped, so both `\n` and `\r\n`
  line endings are accepted;
- a blank line is a row with one empty field. Blank lines are never skipped
  because the layout is read at fixed positions;
- a quoted field that is never closed runs until the end of the file.

```text
Deskripsi,,,Profil Desa,,,Sekolah,Alamat
"Desa pesisir, di teluk",,,Luas wilayah,12 km2,,SDN 1,Jl. Poros
```

### `xlsx`

The worksheet is read with its cells at their usual positions: `A1` is row 0
and column 0, even when the first rows or columns of the sheet are empty.
Numbers are written without decimals when they are whole.

## Layout

The position of every piece of the profile is fixed. Rows and columns start
at 0 (row 0 is the spreadsheet row 1, column 0 is column `A`).

| Field                          | Rows          | Columns          |
|--------------------------------|---------------|------------------|
| description                    | 1             | 0 (`A2`)         |
| profile items (title, body)    | 1 to 8        | 3, 4 (`D`, `E`)  |
| school (name, address)         | 1             | 6, 7 (`G2`, `H2`)|
| SAINTEK (issue, potential, project) | 13 to the end | 0, 1, 2 (`A:C`) |
| AGRO                           | 13 to the end | 3, 4, 5 (`D:F`)  |
| KESRA                          | 13 to the end | 6, 7, 8 (`G:I`)  |
| SOSHUM                         | 13 to the end | 9, 10, 11 (`J:L`)|

Row 12 holds the category headers and is not read.

A cell counts only if it contains something else than whitespace. A profile
item is kept only when its title is filled. In the categories, each column
is read on its own: a row may contain an issue without a potential.

The layout is described by [crate::LayoutSchema::VILLAGE_LAYOUT]. Other
layouts can be decoded with [crate::decode_with_schema]:

```
use village_profile::*;

const SCHOOL_ONLY: LayoutSchema = LayoutSchema {
    rules: &[FieldRule {
        target: Target::School,
        rows: RowSpan::single(0),
        columns: &[0, 1],
    }],
};

let grid = tokenize("SMP 2 Bualemo,Jl. Trans Sulawesi");
let profile = decode_with_schema(&grid, &SCHOOL_ONLY);
assert_eq!(profile.school.name, "SMP 2 Bualemo");
assert!(profile.profile_items.is_empty());
```

## Configuration

`profildesa` reads the three villages of the original spreadsheet when no
configuration is given. A configuration file in JSON lists other sources:

```text
{
  "sheetBaseUrl": "https://docs.google.com/spreadsheets/d/e/<id>/pub?output=csv",
  "aggregation": "partialTolerant",
  "timeoutSeconds": 10,
  "sources": [
    { "name": "Kampangar", "gid": "0" },
    { "name": "Kuntang", "provider": "csv", "filePath": "kuntang.csv" },
    { "name": "Pulo Dua", "provider": "xlsx", "filePath": "desa.xlsx", "excelWorksheetName": "Pulo Dua" }
  ]
}
```

- `aggregation` is `allOrNothing` (default): the run fails as soon as one
  source cannot be read. With `partialTolerant`, the sources that cannot be
  read are reported and left empty.
- `filePath` is relative to the directory of the configuration file.

 */
