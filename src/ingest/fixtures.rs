/// Test fixtures: representative FIRMS archive extracts.
///
/// The archive download (https://firms.modaps.eosdis.nasa.gov/download/)
/// delivers one CSV per instrument. Shape of the MODIS file:
///
///   latitude,longitude,brightness,scan,track,acq_date,acq_time,satellite,
///   instrument,confidence,version,bright_t31,frp,daynight,type
///
/// The VIIRS file carries `bright_ti4`/`bright_ti5` instead of
/// `brightness`/`bright_t31` and a class letter (`l`, `n`, `h`) as
/// confidence. `acq_time` is UTC `HHMM` without leading zeros.

/// MODIS detections: one at Duisburg (false alarm candidate), one wildfire
/// in Brandenburg, one low-confidence detection at Dillingen.
#[cfg(test)]
pub(crate) fn fixture_modis_archive_csv() -> &'static str {
    "latitude,longitude,brightness,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_t31,frp,daynight,type
51.43,6.76,318.4,1.0,1.0,2023-07-14,1200,Aqua,MODIS,90,6.03,296.1,21.7,D,2
52.0123,13.4031,330.2,1.1,1.0,2023-07-14,1235,Aqua,MODIS,77,6.03,298.4,44.0,D,0
49.352,6.731,309.8,1.0,1.0,2023-07-15,945,Terra,MODIS,42,6.03,295.0,9.8,D,2
"
}

/// VIIRS detections matching the MODIS fixture in space and time.
#[cfg(test)]
pub(crate) fn fixture_viirs_archive_csv() -> &'static str {
    "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_ti5,frp,daynight,type
51.43,6.76,336.5,0.39,0.36,2023-07-14,1203,N,VIIRS,n,2,291.2,8.1,D,2
52.0131,13.4050,348.9,0.41,0.37,2023-07-14,1241,N,VIIRS,h,2,294.8,17.3,D,0
48.1000,11.5000,331.0,0.40,0.36,2023-07-14,1244,N,VIIRS,l,2,290.1,3.2,D,0
"
}

/// Already-normalized table as exported by earlier tooling: one combined
/// timestamp column and an explicit `source` column.
#[cfg(test)]
pub(crate) fn fixture_normalized_csv() -> &'static str {
    "source,latitude,longitude,acq_datetime,confidence
MODIS,51.43,6.76,2023-07-14T12:00:00Z,90
VIIRS,51.43,6.76,2023-07-14 12:03,85
"
}

/// Rows with every kind of defect the loader must skip, surrounded by two
/// valid rows. Line numbers: header = 1, valid rows at lines 2 and 9.
#[cfg(test)]
pub(crate) fn fixture_malformed_rows_csv() -> &'static str {
    "source,latitude,longitude,acq_date,acq_time,confidence
MODIS,51.43,6.76,2023-07-14,1200,90
GOES,51.43,6.76,2023-07-14,1200,90
VIIRS,,6.76,2023-07-14,1200,h
VIIRS,95.0,6.76,2023-07-14,1200,h
MODIS,51.43,6.76,2023-13-01,1200,90
MODIS,51.43,6.76,2023-07-14,2475,90
VIIRS,51.43,6.76,2023-07-14,1200,maybe
VIIRS,51.43,6.76,2023-07-14,1203,h
"
}
