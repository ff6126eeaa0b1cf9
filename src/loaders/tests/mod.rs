mod csv_export_tests;
