use crate::error::LoadError;
use crate::loaders::csv_export;
use crate::results::LinkRecord;

#[cfg(test)]
mod parse_tests {
    use super::*;

    const HEADER: &str = "Fuente;Destino;Ancla;Código de estado\n";

    #[test]
    fn test_single_row() {
        let input = format!("{HEADER}https://a.com/;https://a.com/x;Ver más;404\n");
        let records = csv_export::parse(input.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![LinkRecord::new(
                "https://a.com/",
                "https://a.com/x",
                Some("Ver más"),
                404
            )]
        );
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut input = b"\xEF\xBB\xBF".to_vec();
        input.extend_from_slice(HEADER.as_bytes());
        input.extend_from_slice(b"https://a.com/;https://a.com/y;Inicio;301\n");

        let records = csv_export::parse(&input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "https://a.com/");
        assert_eq!(records[0].status, 301);
    }

    #[test]
    fn test_empty_anchor_is_none() {
        let input = format!("{HEADER}https://a.com/;https://a.com/x;;404\n");
        let records = csv_export::parse(input.as_bytes()).unwrap();
        assert_eq!(records[0].anchor, None);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let input = "Tipo;Fuente;Destino;Tamaño;Ancla;Código de estado;Estado\n\
                     Hipervínculo;https://a.com/;https://a.com/z;0;Contacto;403;Forbidden\n";
        let records = csv_export::parse(input.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![LinkRecord::new(
                "https://a.com/",
                "https://a.com/z",
                Some("Contacto"),
                403
            )]
        );
    }

    #[test]
    fn test_quoted_field_with_semicolon() {
        let input = format!("{HEADER}https://a.com/;https://a.com/x;\"Uno; dos\";404\n");
        let records = csv_export::parse(input.as_bytes()).unwrap();
        assert_eq!(records[0].anchor.as_deref(), Some("Uno; dos"));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let records = csv_export::parse(HEADER.as_bytes()).unwrap();
        assert!(records.is_empty());
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_missing_column() {
        let input = "Fuente;Destino;Código de estado\nhttps://a.com/;https://a.com/x;404\n";
        match csv_export::parse(input.as_bytes()) {
            Err(LoadError::MissingColumn(column)) => assert_eq!(column, "Ancla"),
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn test_comma_delimited_file_is_rejected() {
        let input = "Fuente,Destino,Ancla,Código de estado\nhttps://a.com/,https://a.com/x,Ir,404\n";
        assert!(matches!(
            csv_export::parse(input.as_bytes()),
            Err(LoadError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_non_numeric_status() {
        let input = "Fuente;Destino;Ancla;Código de estado\nhttps://a.com/;https://a.com/x;Ir;roto\n";
        assert!(matches!(
            csv_export::parse(input.as_bytes()),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn test_negative_status() {
        let input = "Fuente;Destino;Ancla;Código de estado\nhttps://a.com/;https://a.com/x;Ir;-1\n";
        assert!(csv_export::parse(input.as_bytes()).is_err());
    }

    #[test]
    fn test_short_row() {
        let input = "Fuente;Destino;Ancla;Código de estado\nhttps://a.com/;https://a.com/x\n";
        assert!(matches!(
            csv_export::parse(input.as_bytes()),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut input = b"Fuente;Destino;Ancla;C\xF3digo de estado\n".to_vec();
        input.extend_from_slice(b"https://a.com/;https://a.com/x;Ir;404\n");
        assert!(csv_export::parse(&input).is_err());
    }
}
