mod invalid_json;
